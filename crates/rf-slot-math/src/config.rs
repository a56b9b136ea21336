//! Game and run configuration
//!
//! A [`GameConfig`] is the validated, engine-ready description of a game.
//! It is produced by [`crate::parser::GameParser`] (or assembled directly in
//! tests) and must pass [`GameConfig::validate`] before an engine is built.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::paytable::{PayTable, Payline};
use crate::symbols::{ReelStrip, SymbolId, SymbolSet};

/// Visible window size (reels × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub reels: usize,
    /// Number of visible rows per reel
    pub rows: usize,
}

impl GridSpec {
    /// Create a grid spec
    pub fn new(reels: usize, rows: usize) -> Self {
        Self { reels, rows }
    }

    /// Standard 5×3
    pub fn standard_5x3() -> Self {
        Self::new(5, 3)
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.reels * self.rows
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RULE VARIANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Wild expansion strategy, applied after the reels stop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildExpansion {
    /// Wilds stay where they land
    #[default]
    None,
    /// A wild on a winning line fills its reel, moving left to right
    CascadingReveal,
    /// Extending wilds overwrite their 3×3 neighbourhood
    Neighborhood,
    /// Reels holding the wild fill with it, kept only if lines then pay
    FullReel,
    /// Reels partly covered by the wild fill with it unconditionally
    RowWide,
}

impl WildExpansion {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::CascadingReveal => "Cascading Reveal",
            Self::Neighborhood => "Neighborhood",
            Self::FullReel => "Full Reel",
            Self::RowWide => "Row Wide",
        }
    }
}

/// Free spins trigger rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FreeSpinTrigger {
    /// No free spins
    #[default]
    None,
    /// `spins` awarded for `scatters` or more trigger symbols
    AtLeast { scatters: usize, spins: u32 },
    /// `spins` awarded for exactly `scatters` trigger symbols
    Exactly { scatters: usize, spins: u32 },
}

impl FreeSpinTrigger {
    /// Spins awarded for `count` trigger symbols in the window
    pub fn award(&self, count: usize) -> u32 {
        match *self {
            Self::None => 0,
            Self::AtLeast { scatters, spins } if count >= scatters => spins,
            Self::Exactly { scatters, spins } if count == scatters => spins,
            _ => 0,
        }
    }

    /// Check if the rule can ever award spins
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// How scatter pays are scaled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterPay {
    /// Paytable value × total stake × scatter multiplier
    #[default]
    Stake,
    /// Paytable value × scatter multiplier, independent of stake
    Fixed,
}

/// Named rule combinations for the classic game profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePreset {
    /// Lines and scatters only
    #[default]
    Classic,
    /// Cascading reveal expansion
    RevealingWilds,
    /// Neighbourhood expansion
    SpreadingWilds,
    /// 15 free spins on 3+ scatters, fixed scatter pays
    ScatterFreeSpins,
    /// 12 free spins on exactly 3 scatters
    ExactScatterFreeSpins,
    /// Full-reel expansion followed by collapses
    BlastCollapse,
    /// Row-wide expansion, both-ways lines, bonus spin per expansion
    StarReveal,
}

impl RulePreset {
    /// Rules this preset starts from
    pub fn rules(&self) -> Rules {
        let base = Rules::default();
        match self {
            Self::Classic => base,
            Self::RevealingWilds => Rules {
                expansion: WildExpansion::CascadingReveal,
                ..base
            },
            Self::SpreadingWilds => Rules {
                expansion: WildExpansion::Neighborhood,
                ..base
            },
            Self::ScatterFreeSpins => Rules {
                free_spins: FreeSpinTrigger::AtLeast {
                    scatters: 3,
                    spins: 15,
                },
                scatter_pay: ScatterPay::Fixed,
                ..base
            },
            Self::ExactScatterFreeSpins => Rules {
                free_spins: FreeSpinTrigger::Exactly {
                    scatters: 3,
                    spins: 12,
                },
                ..base
            },
            Self::BlastCollapse => Rules {
                expansion: WildExpansion::FullReel,
                collapse: true,
                ..base
            },
            Self::StarReveal => Rules {
                expansion: WildExpansion::RowWide,
                both_ways: true,
                reveal_bonus_spin: true,
                sticky_extending_wilds: true,
                ..base
            },
        }
    }
}

/// Default safety cap on collapse steps per round
pub const DEFAULT_MAX_COLLAPSES: u32 = 1000;

/// Default safety cap on free spins played per base round
pub const DEFAULT_MAX_FREE_SPINS: u32 = 10_000;

/// Active rule set, selected once when the game is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Wild expansion strategy
    pub expansion: WildExpansion,
    /// Free spins trigger
    pub free_spins: FreeSpinTrigger,
    /// Scatter pay scaling
    pub scatter_pay: ScatterPay,
    /// Evaluate lines right-to-left as well
    pub both_ways: bool,
    /// Collapse and refill after winning base spins
    pub collapse: bool,
    /// One extra free spin whenever an expansion changed the window
    pub reveal_bonus_spin: bool,
    /// Extending wilds stay in place across free spins
    pub sticky_extending_wilds: bool,
    /// Wild used to fill expanded cells (first wild when unset)
    pub substitute_wild: Option<SymbolId>,
    /// Safety cap on collapse steps in one round
    pub max_collapses: u32,
    /// Safety cap on free spins played in one round
    pub max_free_spins: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            expansion: WildExpansion::None,
            free_spins: FreeSpinTrigger::None,
            scatter_pay: ScatterPay::Stake,
            both_ways: false,
            collapse: false,
            reveal_bonus_spin: false,
            sticky_extending_wilds: false,
            substitute_wild: None,
            max_collapses: DEFAULT_MAX_COLLAPSES,
            max_free_spins: DEFAULT_MAX_FREE_SPINS,
        }
    }
}

/// Global win multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Multipliers {
    /// Applied to every scatter win
    pub scatter: u64,
    /// Replaces 1× on lines completed with a substituting wild
    pub wild_in_line: u64,
    /// Applied to every free spin win
    pub free_spins: u64,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            scatter: 1,
            wild_in_line: 1,
            free_spins: 1,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GAME CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Complete, engine-ready game description
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Game name
    pub name: String,
    /// Window size
    pub grid: GridSpec,
    /// Symbols with capability lookups
    pub symbols: SymbolSet,
    /// (symbol, count) → multiplier
    pub paytable: PayTable,
    /// Active paylines
    pub paylines: Vec<Payline>,
    /// Base game strips, one per reel
    pub base_reels: Vec<ReelStrip>,
    /// Free spins strips, one per reel
    pub free_reels: Vec<ReelStrip>,
    /// Global multipliers
    pub multipliers: Multipliers,
    /// Bet per line
    pub line_bet: u64,
    /// Active rule set
    pub rules: Rules,
}

impl GameConfig {
    /// Create a classic game. Free strips start as a copy of the base strips.
    pub fn new(
        name: impl Into<String>,
        grid: GridSpec,
        symbols: SymbolSet,
        paytable: PayTable,
        paylines: Vec<Payline>,
        base_reels: Vec<ReelStrip>,
    ) -> Self {
        Self {
            name: name.into(),
            grid,
            symbols,
            paytable,
            paylines,
            free_reels: base_reels.clone(),
            base_reels,
            multipliers: Multipliers::default(),
            line_bet: 1,
            rules: Rules::default(),
        }
    }

    /// Use dedicated free spins strips
    pub fn with_free_reels(mut self, reels: Vec<ReelStrip>) -> Self {
        self.free_reels = reels;
        self
    }

    /// Set the rule set
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Set global multipliers
    pub fn with_multipliers(mut self, multipliers: Multipliers) -> Self {
        self.multipliers = multipliers;
        self
    }

    /// Set the bet per line
    pub fn with_line_bet(mut self, line_bet: u64) -> Self {
        self.line_bet = line_bet;
        self
    }

    /// Stake of one spin (bet per line × active lines)
    pub fn total_bet(&self) -> u64 {
        self.line_bet * self.paylines.len() as u64
    }

    /// Wild written into expanded cells
    pub fn substitute_wild(&self) -> Option<SymbolId> {
        self.rules.substitute_wild.or_else(|| self.symbols.first_wild())
    }

    /// Number of base game stop combinations
    pub fn base_combinations(&self) -> u128 {
        self.base_reels.iter().map(|r| r.len() as u128).product()
    }

    /// Check structural consistency.
    ///
    /// Non-monotonic paytable rows are legal and not reported here; see
    /// [`PayTable::non_monotonic`].
    pub fn validate(&self) -> ConfigResult<()> {
        let GridSpec { reels, rows } = self.grid;
        if reels == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { reels, rows });
        }

        if self.paytable.reels() != reels || self.paytable.symbol_count() != self.symbols.len() {
            return Err(ConfigError::InvalidValue(format!(
                "paytable is {}x{}, game has {} reels and {} symbols",
                self.paytable.reels(),
                self.paytable.symbol_count(),
                reels,
                self.symbols.len()
            )));
        }

        if self.paylines.is_empty() {
            return Err(ConfigError::NoPaylines);
        }
        for (line, payline) in self.paylines.iter().enumerate() {
            if payline.len() != reels {
                return Err(ConfigError::PaylineLength {
                    line,
                    expected: reels,
                    found: payline.len(),
                });
            }
            if let Some((reel, &row)) = payline.rows.iter().enumerate().find(|(_, r)| **r >= rows) {
                return Err(ConfigError::PaylineRow {
                    line,
                    reel,
                    row,
                    rows,
                });
            }
        }

        self.validate_strips("base", &self.base_reels)?;
        self.validate_strips("free", &self.free_reels)?;

        if self.line_bet == 0 {
            return Err(ConfigError::ZeroLineBet);
        }

        if let Some(wild) = self.rules.substitute_wild {
            if !self.symbols.is_wild(wild) {
                return Err(ConfigError::InvalidValue(format!(
                    "substitute wild '{}' is not a wild symbol",
                    self.symbols.name(wild)
                )));
            }
        }
        let needs_wild = match self.rules.expansion {
            WildExpansion::None => None,
            WildExpansion::CascadingReveal => Some("cascading_reveal"),
            WildExpansion::Neighborhood => Some("neighborhood"),
            WildExpansion::FullReel => Some("full_reel"),
            WildExpansion::RowWide => Some("row_wide"),
        };
        if let Some(rule) = needs_wild {
            if self.substitute_wild().is_none() {
                return Err(ConfigError::MissingWild { rule });
            }
        }

        Ok(())
    }

    fn validate_strips(&self, set: &'static str, strips: &[ReelStrip]) -> ConfigResult<()> {
        if strips.len() != self.grid.reels {
            return Err(ConfigError::StripCount {
                set,
                expected: self.grid.reels,
                found: strips.len(),
            });
        }
        for (reel, strip) in strips.iter().enumerate() {
            if strip.is_empty() {
                return Err(ConfigError::EmptyStrip { set, reel });
            }
            if let Some(&bad) = strip.symbols.iter().find(|&&s| s as usize >= self.symbols.len()) {
                return Err(ConfigError::UnknownSymbol {
                    name: format!("#{bad}"),
                    context: format!("{set} reel {reel}"),
                });
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUN OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Histogram bucket layout used at report time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramSpec {
    /// Upper bound of the first bucket
    pub initial_bin: u64,
    /// Added on top of doubling for each next bound
    pub increment: u64,
}

impl Default for HistogramSpec {
    fn default() -> Self {
        Self {
            initial_bin: 1,
            increment: 0,
        }
    }
}

/// Simulation run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Monte Carlo base rounds to play
    pub rounds: u64,
    /// Rounds between progress log lines (0 = silent)
    pub progress_interval: u64,
    /// RNG seed (OS entropy when unset)
    pub seed: Option<u64>,
    /// Parallel workers (1 = sequential)
    pub workers: usize,
    /// Enumerate every base stop combination instead of sampling
    pub brute_force: bool,
    /// Treat wilds as plain symbols on lines
    pub wilds_off: bool,
    /// Never award free spins
    pub free_spins_off: bool,
    /// Histogram layout
    pub histogram: HistogramSpec,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            rounds: 1_000_000,
            progress_interval: 0,
            seed: None,
            workers: 1,
            brute_force: false,
            wilds_off: false,
            free_spins_off: false,
            histogram: HistogramSpec::default(),
        }
    }
}

impl RunOptions {
    /// Set the number of rounds
    pub fn with_rounds(mut self, rounds: u64) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Enable brute force enumeration
    pub fn brute_force(mut self) -> Self {
        self.brute_force = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{Symbol, SymbolKind};

    fn tiny_game() -> GameConfig {
        let symbols = SymbolSet::new(vec![
            Symbol::regular(0, "A"),
            Symbol::new(1, "W", &[SymbolKind::Wild]),
        ]);
        let paytable = PayTable::new(3, 2).with_row(0, &[0, 0, 5]);
        let strips = vec![ReelStrip::new(vec![0, 1]); 3];
        GameConfig::new(
            "tiny",
            GridSpec::new(3, 1),
            symbols,
            paytable,
            vec![Payline::straight(0, 3)],
            strips,
        )
    }

    #[test]
    fn test_trigger_award() {
        let at_least = FreeSpinTrigger::AtLeast {
            scatters: 3,
            spins: 15,
        };
        assert_eq!(at_least.award(2), 0);
        assert_eq!(at_least.award(3), 15);
        assert_eq!(at_least.award(5), 15);

        let exactly = FreeSpinTrigger::Exactly {
            scatters: 3,
            spins: 12,
        };
        assert_eq!(exactly.award(3), 12);
        assert_eq!(exactly.award(4), 0);
        assert_eq!(FreeSpinTrigger::None.award(9), 0);
    }

    #[test]
    fn test_presets() {
        let rules = RulePreset::StarReveal.rules();
        assert_eq!(rules.expansion, WildExpansion::RowWide);
        assert!(rules.both_ways);
        assert!(rules.reveal_bonus_spin);

        let rules = RulePreset::ScatterFreeSpins.rules();
        assert_eq!(rules.scatter_pay, ScatterPay::Fixed);
        assert_eq!(rules.free_spins.award(3), 15);

        assert_eq!(RulePreset::Classic.rules(), Rules::default());
    }

    #[test]
    fn test_validate_ok() {
        let game = tiny_game();
        assert!(game.validate().is_ok());
        assert_eq!(game.total_bet(), 1);
        assert_eq!(game.base_combinations(), 8);
        assert_eq!(game.substitute_wild(), Some(1));
    }

    #[test]
    fn test_validate_empty_strip() {
        let mut game = tiny_game();
        game.free_reels[2] = ReelStrip::new(vec![]);
        assert!(matches!(
            game.validate(),
            Err(ConfigError::EmptyStrip { set: "free", reel: 2 })
        ));
    }

    #[test]
    fn test_validate_payline_row() {
        let mut game = tiny_game();
        game.paylines.push(Payline::new(vec![0, 1, 0]));
        assert!(matches!(
            game.validate(),
            Err(ConfigError::PaylineRow { line: 1, reel: 1, .. })
        ));
    }

    #[test]
    fn test_validate_zero_bet() {
        let game = tiny_game().with_line_bet(0);
        assert!(matches!(game.validate(), Err(ConfigError::ZeroLineBet)));
    }

    #[test]
    fn test_expansion_needs_wild() {
        let mut game = tiny_game();
        game.symbols = SymbolSet::new(vec![Symbol::regular(0, "A"), Symbol::regular(1, "B")]);
        game.rules.expansion = WildExpansion::RowWide;
        assert!(matches!(
            game.validate(),
            Err(ConfigError::MissingWild { rule: "row_wide" })
        ));
    }
}
