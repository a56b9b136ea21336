//! Game document parser
//!
//! Game documents are YAML or JSON files that name every symbol by its
//! display name. Parsing is two-step: serde deserializes a [`GameDocument`],
//! then [`GameParser`] resolves names to symbol ids, applies rule presets and
//! hands the result to [`GameConfig::validate`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! let parser = GameParser::new();
//! let game = parser.load("games/classic.yaml")?;
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{
    FreeSpinTrigger, GameConfig, GridSpec, Multipliers, RulePreset, Rules, ScatterPay,
    WildExpansion,
};
use crate::error::{ConfigError, ConfigResult};
use crate::paytable::{PayTable, Payline};
use crate::symbols::{ReelStrip, Symbol, SymbolId, SymbolKinds, SymbolSet};

/// Game document parser
pub struct GameParser {
    /// Size limits
    pub limits: GameLimits,
}

/// Size limits applied before conversion
#[derive(Debug, Clone)]
pub struct GameLimits {
    pub max_symbols: usize,
    pub max_paylines: usize,
    pub max_reels: usize,
    pub max_rows: usize,
    pub max_strip_length: usize,
}

impl Default for GameLimits {
    fn default() -> Self {
        Self {
            max_symbols: 64,
            max_paylines: 1024,
            max_reels: 10,
            max_rows: 10,
            max_strip_length: 100_000,
        }
    }
}

impl GameParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self {
            limits: GameLimits::default(),
        }
    }

    /// Create parser with custom limits
    pub fn with_limits(limits: GameLimits) -> Self {
        Self { limits }
    }

    /// Load a game file, picking the format from its extension
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<GameConfig> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        log::debug!("Loading game from {}", path.display());
        match extension.as_str() {
            "yaml" | "yml" => self.parse_yaml(&text),
            "json" => self.parse_json(&text),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Parse a JSON game document
    pub fn parse_json(&self, json: &str) -> ConfigResult<GameConfig> {
        let doc: GameDocument =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        self.convert(doc)
    }

    /// Parse a YAML game document
    pub fn parse_yaml(&self, yaml: &str) -> ConfigResult<GameConfig> {
        let doc: GameDocument =
            serde_yml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        self.convert(doc)
    }

    /// Validate, convert and check a document
    pub fn convert(&self, doc: GameDocument) -> ConfigResult<GameConfig> {
        self.check_limits(&doc)?;
        let game = self.to_game_config(doc)?;
        game.validate()?;
        for (symbol, count) in game.paytable.non_monotonic() {
            log::warn!(
                "Paytable: {} pays less for {} than for {} of a kind",
                game.symbols.name(symbol),
                count,
                count - 1
            );
        }
        log::debug!(
            "Loaded '{}': {}x{} window, {} symbols, {} lines, {} base combinations",
            game.name,
            game.grid.reels,
            game.grid.rows,
            game.symbols.len(),
            game.paylines.len(),
            game.base_combinations()
        );
        Ok(game)
    }

    /// Check document size limits
    pub fn check_limits(&self, doc: &GameDocument) -> ConfigResult<()> {
        let over = |what: &str, found: usize, max: usize| {
            ConfigError::InvalidValue(format!("too many {what}: {found} > {max}"))
        };

        if doc.symbols.len() > self.limits.max_symbols {
            return Err(over("symbols", doc.symbols.len(), self.limits.max_symbols));
        }
        if doc.paylines.len() > self.limits.max_paylines {
            return Err(over("paylines", doc.paylines.len(), self.limits.max_paylines));
        }
        if doc.grid.reels > self.limits.max_reels {
            return Err(over("reels", doc.grid.reels, self.limits.max_reels));
        }
        if doc.grid.rows > self.limits.max_rows {
            return Err(over("rows", doc.grid.rows, self.limits.max_rows));
        }
        let longest = doc
            .reels
            .base
            .iter()
            .chain(doc.reels.free.iter().flatten())
            .map(|s| s.len())
            .max()
            .unwrap_or(0);
        if longest > self.limits.max_strip_length {
            return Err(over("strip positions", longest, self.limits.max_strip_length));
        }
        Ok(())
    }

    /// Resolve names and build the config
    fn to_game_config(&self, doc: GameDocument) -> ConfigResult<GameConfig> {
        let grid = doc.grid;
        if grid.reels == 0 || grid.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                reels: grid.reels,
                rows: grid.rows,
            });
        }

        let mut seen = HashSet::new();
        let mut symbols = Vec::with_capacity(doc.symbols.len());
        for (id, entry) in doc.symbols.iter().enumerate() {
            let name = entry.name.trim();
            if !seen.insert(name.to_string()) {
                return Err(ConfigError::DuplicateSymbol(name.to_string()));
            }
            symbols.push(Symbol {
                id: id as SymbolId,
                name: name.to_string(),
                kinds: entry.kinds,
            });
        }
        let symbols = SymbolSet::new(symbols);

        let lookup = |name: &str, context: &str| -> ConfigResult<SymbolId> {
            symbols
                .find(name)
                .map(|s| s.id)
                .ok_or_else(|| ConfigError::UnknownSymbol {
                    name: name.trim().to_string(),
                    context: context.to_string(),
                })
        };

        let mut paytable = PayTable::new(grid.reels, symbols.len());
        for (name, pays) in &doc.paytable {
            let id = lookup(name, "paytable")?;
            if pays.len() != grid.reels {
                return Err(ConfigError::PaytableDimension {
                    symbol: name.clone(),
                    expected: grid.reels,
                    found: pays.len(),
                });
            }
            paytable.set_row(id, pays);
        }

        let strips = |set: &str, reels: &[Vec<String>]| -> ConfigResult<Vec<ReelStrip>> {
            reels
                .iter()
                .enumerate()
                .map(|(reel, names)| {
                    let context = format!("{set} reel {reel}");
                    names
                        .iter()
                        .map(|n| lookup(n, &context))
                        .collect::<ConfigResult<Vec<_>>>()
                        .map(ReelStrip::new)
                })
                .collect()
        };
        let base_reels = strips("base", &doc.reels.base)?;
        let free_reels = match &doc.reels.free {
            Some(free) => strips("free", free)?,
            None => base_reels.clone(),
        };

        let mut rules = doc.rules.preset.unwrap_or_default().rules();
        let overrides = &doc.rules;
        if let Some(expansion) = overrides.expansion {
            rules.expansion = expansion;
        }
        if let Some(free_spins) = overrides.free_spins {
            rules.free_spins = free_spins;
        }
        if let Some(scatter_pay) = overrides.scatter_pay {
            rules.scatter_pay = scatter_pay;
        }
        if let Some(both_ways) = overrides.both_ways {
            rules.both_ways = both_ways;
        }
        if let Some(collapse) = overrides.collapse {
            rules.collapse = collapse;
        }
        if let Some(bonus) = overrides.reveal_bonus_spin {
            rules.reveal_bonus_spin = bonus;
        }
        if let Some(sticky) = overrides.sticky_extending_wilds {
            rules.sticky_extending_wilds = sticky;
        }
        if let Some(cap) = overrides.max_collapses {
            rules.max_collapses = cap;
        }
        if let Some(cap) = overrides.max_free_spins {
            rules.max_free_spins = cap;
        }
        if let Some(name) = &overrides.substitute_wild {
            rules.substitute_wild = Some(lookup(name, "rules.substitute_wild")?);
        }

        Ok(GameConfig {
            name: doc.name,
            grid,
            symbols,
            paytable,
            paylines: doc.paylines,
            base_reels,
            free_reels,
            multipliers: doc.multipliers,
            line_bet: doc.line_bet,
            rules,
        })
    }
}

impl Default for GameParser {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DOCUMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Game document structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDocument {
    /// Game name
    #[serde(default = "default_name")]
    pub name: String,
    /// Window size
    pub grid: GridSpec,
    /// Symbols in index order
    pub symbols: Vec<SymbolEntry>,
    /// Symbol name → pays for 1..=reels of a kind
    #[serde(default)]
    pub paytable: BTreeMap<String, Vec<u64>>,
    /// Paylines
    pub paylines: Vec<Payline>,
    /// Reel strips by symbol name
    pub reels: ReelsEntry,
    /// Global multipliers
    #[serde(default)]
    pub multipliers: Multipliers,
    /// Bet per line
    #[serde(default = "default_line_bet")]
    pub line_bet: u64,
    /// Rule preset and overrides
    #[serde(default)]
    pub rules: RulesEntry,
}

fn default_name() -> String {
    "Untitled".to_string()
}

fn default_line_bet() -> u64 {
    1
}

/// Symbol in a game document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub name: String,
    #[serde(default)]
    pub kinds: SymbolKinds,
}

/// Reel strip sets in a game document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelsEntry {
    pub base: Vec<Vec<String>>,
    /// Free spins strips (base strips when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<Vec<Vec<String>>>,
}

/// Rules block. Explicit fields override the preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<RulePreset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion: Option<WildExpansion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_spins: Option<FreeSpinTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter_pay: Option<ScatterPay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub both_ways: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_bonus_spin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky_extending_wilds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute_wild: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_collapses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_free_spins: Option<u32>,
}

impl RulesEntry {
    /// Spell out every rule explicitly
    fn explicit(rules: &Rules, symbols: &SymbolSet) -> Self {
        Self {
            preset: None,
            expansion: Some(rules.expansion),
            free_spins: Some(rules.free_spins),
            scatter_pay: Some(rules.scatter_pay),
            both_ways: Some(rules.both_ways),
            collapse: Some(rules.collapse),
            reveal_bonus_spin: Some(rules.reveal_bonus_spin),
            sticky_extending_wilds: Some(rules.sticky_extending_wilds),
            substitute_wild: rules.substitute_wild.map(|w| symbols.name(w).to_string()),
            max_collapses: Some(rules.max_collapses),
            max_free_spins: Some(rules.max_free_spins),
        }
    }
}

impl GameDocument {
    /// Write a config back out as a document (rules spelled out, no preset)
    pub fn from_config(game: &GameConfig) -> Self {
        let names = |strips: &[ReelStrip]| -> Vec<Vec<String>> {
            strips
                .iter()
                .map(|s| {
                    s.symbols
                        .iter()
                        .map(|&id| game.symbols.name(id).to_string())
                        .collect()
                })
                .collect()
        };
        let paytable = game
            .symbols
            .symbols()
            .iter()
            .filter(|s| game.paytable.total_pay(s.id) > 0)
            .map(|s| (s.name.clone(), game.paytable.row(s.id)))
            .collect();

        Self {
            name: game.name.clone(),
            grid: game.grid,
            symbols: game
                .symbols
                .symbols()
                .iter()
                .map(|s| SymbolEntry {
                    name: s.name.clone(),
                    kinds: s.kinds,
                })
                .collect(),
            paytable,
            paylines: game.paylines.clone(),
            reels: ReelsEntry {
                base: names(&game.base_reels),
                free: Some(names(&game.free_reels)),
            },
            multipliers: game.multipliers,
            line_bet: game.line_bet,
            rules: RulesEntry::explicit(&game.rules, &game.symbols),
        }
    }

    /// Serialize as YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        serde_yml::to_string(self).map_err(|e| ConfigError::Yaml(e.to_string()))
    }
}
