//! Symbol definitions and reel strips

use serde::{Deserialize, Serialize};

/// Stable symbol index (position in the game's symbol list)
pub type SymbolId = u32;

/// Sentinel for an empty cell (cascade intermediate states, cleared views)
pub const NO_SYMBOL: SymbolId = SymbolId::MAX;

/// Symbol capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SymbolKind {
    /// Regular paying symbol
    Regular = 0,
    /// Substitutes for regular symbols on lines
    Wild = 1,
    /// Wild that spreads to neighbouring or same-reel cells
    ExtendingWild = 2,
    /// Pays on count anywhere in the window
    Scatter = 3,
    /// Counts toward the free spins trigger
    FreeTrigger = 4,
    /// Triggers a bonus game
    Bonus = 5,
}

impl SymbolKind {
    const ALL: [SymbolKind; 6] = [
        SymbolKind::Regular,
        SymbolKind::Wild,
        SymbolKind::ExtendingWild,
        SymbolKind::Scatter,
        SymbolKind::FreeTrigger,
        SymbolKind::Bonus,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Wild => "Wild",
            Self::ExtendingWild => "Extending Wild",
            Self::Scatter => "Scatter",
            Self::FreeTrigger => "Free",
            Self::Bonus => "Bonus",
        }
    }
}

/// Set of symbol capabilities.
///
/// Capabilities are not exclusive: a symbol can be both `Wild` and
/// `ExtendingWild`. An empty set reads as `Regular`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<SymbolKind>", into = "Vec<SymbolKind>")]
pub struct SymbolKinds(u8);

impl SymbolKinds {
    /// No capabilities (a regular symbol)
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from a list of kinds
    pub fn of(kinds: &[SymbolKind]) -> Self {
        let mut set = Self::empty();
        for &kind in kinds {
            set.insert(kind);
        }
        set
    }

    /// Add a capability
    pub fn insert(&mut self, kind: SymbolKind) {
        self.0 |= kind.bit();
    }

    /// Check a capability
    pub fn contains(&self, kind: SymbolKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Iterate over the capabilities in declaration order
    pub fn iter(&self) -> impl Iterator<Item = SymbolKind> + '_ {
        SymbolKind::ALL.into_iter().filter(|k| self.contains(*k))
    }

    /// True for a symbol with no special capability
    pub fn is_regular(&self) -> bool {
        self.iter().all(|k| k == SymbolKind::Regular)
    }
}

impl From<Vec<SymbolKind>> for SymbolKinds {
    fn from(kinds: Vec<SymbolKind>) -> Self {
        Self::of(&kinds)
    }
}

impl From<SymbolKinds> for Vec<SymbolKind> {
    fn from(kinds: SymbolKinds) -> Self {
        kinds.iter().collect()
    }
}

/// A symbol definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Index in the symbol list
    pub id: SymbolId,
    /// Symbol name (e.g., "SEVEN", "WILD", "STAR")
    pub name: String,
    /// Capabilities
    pub kinds: SymbolKinds,
}

impl Symbol {
    /// Create a symbol with the given capabilities
    pub fn new(id: SymbolId, name: impl Into<String>, kinds: &[SymbolKind]) -> Self {
        Self {
            id,
            name: name.into(),
            kinds: SymbolKinds::of(kinds),
        }
    }

    /// Create a regular symbol
    pub fn regular(id: SymbolId, name: impl Into<String>) -> Self {
        Self::new(id, name, &[SymbolKind::Regular])
    }

    /// Check a capability
    pub fn is(&self, kind: SymbolKind) -> bool {
        self.kinds.contains(kind)
    }

    /// Check if this is a special symbol (anything but regular)
    pub fn is_special(&self) -> bool {
        !self.kinds.is_regular()
    }
}

/// The game's symbols with capability lookups precomputed per index.
///
/// Lookups take a raw [`SymbolId`] and answer `false` for [`NO_SYMBOL`], so
/// evaluation code never has to special-case empty cells.
#[derive(Debug, Clone)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
    wild: Vec<bool>,
    extending: Vec<bool>,
    scatter: Vec<bool>,
    trigger: Vec<bool>,
    wild_ids: Vec<SymbolId>,
    scatter_ids: Vec<SymbolId>,
}

impl SymbolSet {
    /// Build a set. Symbol ids must equal their position in the list.
    pub fn new(symbols: Vec<Symbol>) -> Self {
        let flag = |kind: SymbolKind| symbols.iter().map(|s| s.is(kind)).collect::<Vec<_>>();
        let wild = flag(SymbolKind::Wild);
        let extending = flag(SymbolKind::ExtendingWild);
        let scatter = flag(SymbolKind::Scatter);

        // Extending wilds substitute like plain wilds
        let wild: Vec<bool> = wild
            .iter()
            .zip(&extending)
            .map(|(&w, &e)| w || e)
            .collect();

        // Dedicated free-spin symbols take over the trigger role from scatters
        let free = flag(SymbolKind::FreeTrigger);
        let trigger = if free.iter().any(|&f| f) {
            free
        } else {
            scatter.clone()
        };

        let ids = |mask: &[bool]| {
            mask.iter()
                .enumerate()
                .filter(|(_, f)| **f)
                .map(|(i, _)| i as SymbolId)
                .collect::<Vec<_>>()
        };
        let wild_ids = ids(&wild);
        let scatter_ids = ids(&scatter);

        Self {
            symbols,
            wild,
            extending,
            scatter,
            trigger,
            wild_ids,
            scatter_ids,
        }
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All symbols in index order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Get symbol by ID
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id as usize)
    }

    /// Find a symbol by name
    pub fn find(&self, name: &str) -> Option<&Symbol> {
        let name = name.trim();
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Symbol name, or `***` for an empty cell
    pub fn name(&self, id: SymbolId) -> &str {
        self.get(id).map(|s| s.name.as_str()).unwrap_or("***")
    }

    /// Wild or extending wild
    pub fn is_wild(&self, id: SymbolId) -> bool {
        self.wild.get(id as usize).copied().unwrap_or(false)
    }

    /// Extending wild
    pub fn is_extending(&self, id: SymbolId) -> bool {
        self.extending.get(id as usize).copied().unwrap_or(false)
    }

    /// Scatter
    pub fn is_scatter(&self, id: SymbolId) -> bool {
        self.scatter.get(id as usize).copied().unwrap_or(false)
    }

    /// Counts toward the free spins trigger
    pub fn is_trigger(&self, id: SymbolId) -> bool {
        self.trigger.get(id as usize).copied().unwrap_or(false)
    }

    /// Wild that may substitute on a line (scatters never substitute)
    pub fn substitutes(&self, id: SymbolId) -> bool {
        self.is_wild(id) && !self.is_scatter(id)
    }

    /// All wild symbol IDs in index order
    pub fn wild_ids(&self) -> &[SymbolId] {
        &self.wild_ids
    }

    /// All scatter symbol IDs in index order
    pub fn scatter_ids(&self) -> &[SymbolId] {
        &self.scatter_ids
    }

    /// First wild symbol, used as the expansion substitute by default
    pub fn first_wild(&self) -> Option<SymbolId> {
        self.wild_ids.first().copied()
    }
}

/// A circular reel strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelStrip {
    /// Symbol IDs in order
    pub symbols: Vec<SymbolId>,
}

impl ReelStrip {
    /// Create a new reel strip
    pub fn new(symbols: Vec<SymbolId>) -> Self {
        Self { symbols }
    }

    /// Get symbol at position (wraps around)
    pub fn symbol_at(&self, position: usize) -> SymbolId {
        self.symbols[position % self.symbols.len()]
    }

    /// Position one step above `position`, wrapping to the end
    pub fn previous(&self, position: usize) -> usize {
        if position == 0 {
            self.symbols.len() - 1
        } else {
            position - 1
        }
    }

    /// Get total strip length
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> SymbolSet {
        SymbolSet::new(vec![
            Symbol::regular(0, "SEVEN"),
            Symbol::new(1, "WILD", &[SymbolKind::Wild]),
            Symbol::new(2, "STAR", &[SymbolKind::Wild, SymbolKind::ExtendingWild]),
            Symbol::new(3, "DOLLAR", &[SymbolKind::Scatter]),
        ])
    }

    #[test]
    fn test_kinds_are_not_exclusive() {
        let kinds = SymbolKinds::of(&[SymbolKind::Wild, SymbolKind::ExtendingWild]);
        assert!(kinds.contains(SymbolKind::Wild));
        assert!(kinds.contains(SymbolKind::ExtendingWild));
        assert!(!kinds.contains(SymbolKind::Scatter));
        assert!(!kinds.is_regular());
        assert!(SymbolKinds::empty().is_regular());
    }

    #[test]
    fn test_kinds_serde_as_list() {
        let kinds: SymbolKinds = serde_json::from_str(r#"["wild", "extending_wild"]"#).unwrap();
        assert!(kinds.contains(SymbolKind::ExtendingWild));
        let back = serde_json::to_string(&kinds).unwrap();
        assert_eq!(back, r#"["wild","extending_wild"]"#);
    }

    #[test]
    fn test_symbol_set_lookups() {
        let set = sample_set();
        assert!(set.is_wild(1));
        assert!(set.is_wild(2));
        assert!(set.is_extending(2));
        assert!(!set.is_extending(1));
        assert!(set.is_scatter(3));
        assert!(set.is_trigger(3));
        assert_eq!(set.wild_ids(), &[1, 2]);
        assert_eq!(set.first_wild(), Some(1));
        assert!(!set.is_wild(NO_SYMBOL));
        assert_eq!(set.name(NO_SYMBOL), "***");
        assert_eq!(set.find("DOLLAR").map(|s| s.id), Some(3));
    }

    #[test]
    fn test_free_trigger_takes_over_from_scatter() {
        let set = SymbolSet::new(vec![
            Symbol::new(0, "DOLLAR", &[SymbolKind::Scatter]),
            Symbol::new(1, "BOOK", &[SymbolKind::FreeTrigger]),
        ]);
        assert!(!set.is_trigger(0));
        assert!(set.is_trigger(1));
    }

    #[test]
    fn test_reel_strip_wrap() {
        let strip = ReelStrip::new(vec![1, 2, 3, 4, 5]);
        assert_eq!(strip.symbol_at(0), 1);
        assert_eq!(strip.symbol_at(5), 1); // Wraps
        assert_eq!(strip.symbol_at(7), 3); // Wraps
        assert_eq!(strip.previous(0), 4);
        assert_eq!(strip.previous(3), 2);
    }
}
