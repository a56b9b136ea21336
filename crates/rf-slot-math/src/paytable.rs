//! Paytable and payline definitions

use serde::{Deserialize, Serialize};

use crate::symbols::{NO_SYMBOL, SymbolId};

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Row index for each reel (e.g., [1, 0, 0, 0, 1])
    pub rows: Vec<usize>,
    /// Display color, cosmetic only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Payline {
    /// Create a payline from row indices
    pub fn new(rows: Vec<usize>) -> Self {
        Self { rows, color: None }
    }

    /// Create a straight line (same row across all reels)
    pub fn straight(row: usize, reel_count: usize) -> Self {
        Self::new(vec![row; reel_count])
    }

    /// Create a V-shaped line dipping to the lowest row in the middle
    pub fn v_shape(rows: usize, reel_count: usize) -> Self {
        let mid = reel_count / 2;
        let positions = (0..reel_count)
            .map(|i| {
                let depth = if i <= mid { i } else { reel_count - 1 - i };
                depth.min(rows.saturating_sub(1))
            })
            .collect();
        Self::new(positions)
    }

    /// Attach a display color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Number of reels the line crosses
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The usual 10 lines of a 5×3 window
pub fn standard_5x3_paylines() -> Vec<Payline> {
    vec![
        Payline::straight(1, 5),
        Payline::straight(0, 5),
        Payline::straight(2, 5),
        Payline::new(vec![0, 1, 2, 1, 0]),
        Payline::new(vec![2, 1, 0, 1, 2]),
        Payline::new(vec![1, 0, 0, 0, 1]),
        Payline::new(vec![1, 2, 2, 2, 1]),
        Payline::new(vec![0, 0, 1, 2, 2]),
        Payline::new(vec![2, 2, 1, 0, 0]),
        Payline::new(vec![1, 2, 1, 0, 1]),
    ]
}

/// Win multipliers indexed by (symbol, count-of-a-kind).
///
/// Counts run `0..=reels`; count 0 is stored but can never be set, so it
/// always pays 0. Symbols without an entry pay 0 for every count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayTable {
    reels: usize,
    symbol_count: usize,
    /// Row-major by count: `pays[count * symbol_count + symbol]`
    pays: Vec<u64>,
}

impl PayTable {
    /// Create an all-zero paytable
    pub fn new(reels: usize, symbol_count: usize) -> Self {
        Self {
            reels,
            symbol_count,
            pays: vec![0; (reels + 1) * symbol_count],
        }
    }

    /// Number of reels (highest count)
    pub fn reels(&self) -> usize {
        self.reels
    }

    /// Number of symbols covered
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Multiplier for `count` of `symbol`.
    ///
    /// Count 0, [`NO_SYMBOL`] and out-of-range lookups all pay 0.
    #[inline]
    pub fn pay(&self, symbol: SymbolId, count: usize) -> u64 {
        if count == 0 || count > self.reels || symbol == NO_SYMBOL {
            return 0;
        }
        let symbol = symbol as usize;
        if symbol >= self.symbol_count {
            return 0;
        }
        self.pays[count * self.symbol_count + symbol]
    }

    /// Set the multiplier for `count` of `symbol`. Count 0 is ignored.
    pub fn set(&mut self, symbol: SymbolId, count: usize, value: u64) {
        let symbol = symbol as usize;
        if count == 0 || count > self.reels || symbol >= self.symbol_count {
            return;
        }
        self.pays[count * self.symbol_count + symbol] = value;
    }

    /// Set a whole row, `values[i]` being the pay for `i + 1` of a kind
    pub fn set_row(&mut self, symbol: SymbolId, values: &[u64]) {
        for (i, &value) in values.iter().enumerate() {
            self.set(symbol, i + 1, value);
        }
    }

    /// Builder variant of [`set_row`](Self::set_row)
    pub fn with_row(mut self, symbol: SymbolId, values: &[u64]) -> Self {
        self.set_row(symbol, values);
        self
    }

    /// Pays for counts `1..=reels` of a symbol
    pub fn row(&self, symbol: SymbolId) -> Vec<u64> {
        (1..=self.reels).map(|count| self.pay(symbol, count)).collect()
    }

    /// Sum of a symbol's pays over all counts
    pub fn total_pay(&self, symbol: SymbolId) -> u64 {
        (1..=self.reels).map(|count| self.pay(symbol, count)).sum()
    }

    /// Places where a higher count pays less than the count below it.
    ///
    /// Returns `(symbol, count)` pairs. These are legal, only suspicious.
    pub fn non_monotonic(&self) -> Vec<(SymbolId, usize)> {
        let mut found = Vec::new();
        for symbol in 0..self.symbol_count as SymbolId {
            for count in 2..=self.reels {
                if self.pay(symbol, count) < self.pay(symbol, count - 1) {
                    found.push((symbol, count));
                }
            }
        }
        found
    }
}
