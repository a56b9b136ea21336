//! Reel spinning, stop enumeration and round results

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::symbols::{ReelStrip, SymbolId};
use crate::view::View;

// ═══════════════════════════════════════════════════════════════════════════════
// SPIN GENERATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Fill one reel of the view from `stop`, wrapping around the strip
#[inline]
pub fn fill_reel(view: &mut View, reel: usize, strip: &ReelStrip, stop: usize) {
    let len = strip.len();
    for (row, cell) in view.column_mut(reel).iter_mut().enumerate() {
        *cell = strip.symbols[(stop + row) % len];
    }
}

/// Fill the view from explicit stop positions, recording them in `stops`
pub fn spin_at(view: &mut View, strips: &[ReelStrip], positions: &[usize], stops: &mut [usize]) {
    for (reel, strip) in strips.iter().enumerate() {
        let stop = positions[reel] % strip.len();
        fill_reel(view, reel, strip, stop);
        stops[reel] = stop;
    }
}

/// Fill the view from uniformly random stops, recording them in `stops`
pub fn spin_random<R: Rng + ?Sized>(
    view: &mut View,
    strips: &[ReelStrip],
    stops: &mut [usize],
    rng: &mut R,
) {
    for (reel, strip) in strips.iter().enumerate() {
        let stop = rng.random_range(0..strip.len());
        fill_reel(view, reel, strip, stop);
        stops[reel] = stop;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ODOMETER
// ═══════════════════════════════════════════════════════════════════════════════

/// Brute force stop counter.
///
/// Reel 0 is the fastest-moving digit. Every combination of stops is visited
/// exactly once, in index order, so a range `[start, end)` of indices can be
/// handed to a worker by seeking.
#[derive(Debug, Clone)]
pub struct Odometer {
    lengths: Vec<usize>,
    stops: Vec<usize>,
    index: u128,
    total: u128,
}

impl Odometer {
    /// Start at all-zero stops
    pub fn new(lengths: Vec<usize>) -> Self {
        let total = lengths.iter().map(|&l| l as u128).product();
        let stops = vec![0; lengths.len()];
        Self {
            lengths,
            stops,
            index: 0,
            total,
        }
    }

    /// Counter over the lengths of a strip set
    pub fn for_strips(strips: &[ReelStrip]) -> Self {
        Self::new(strips.iter().map(|s| s.len()).collect())
    }

    /// Start at combination `index`
    pub fn from_index(lengths: Vec<usize>, index: u128) -> Self {
        let mut odometer = Self::new(lengths);
        odometer.seek(index);
        odometer
    }

    /// Jump to combination `index` (clamped to the end)
    pub fn seek(&mut self, index: u128) {
        self.index = index.min(self.total);
        let mut rest = self.index;
        for (stop, &len) in self.stops.iter_mut().zip(&self.lengths) {
            let len = len as u128;
            *stop = (rest % len) as usize;
            rest /= len;
        }
    }

    /// Current stops
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Index of the current combination
    pub fn index(&self) -> u128 {
        self.index
    }

    /// Number of combinations
    pub fn total(&self) -> u128 {
        self.total
    }

    /// True once every combination has been passed
    pub fn is_done(&self) -> bool {
        self.index >= self.total
    }

    /// Step to the next combination. Returns false after the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        self.index += 1;
        for (stop, &len) in self.stops.iter_mut().zip(&self.lengths) {
            *stop += 1;
            if *stop < len {
                break;
            }
            *stop = 0;
        }
        !self.is_done()
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done() {
            return None;
        }
        let current = self.stops.clone();
        self.advance();
        Some(current)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUND RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// Win attributed to one symbol and count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinAttribution {
    /// Count of a kind (line run length or scatter count)
    pub count: usize,
    /// Winning symbol
    pub symbol: SymbolId,
    /// Amount paid, before phase multipliers
    pub amount: u64,
}

/// Summary of one played base round, including its collapses and free spins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Stake of the round
    pub bet: u64,
    /// Base win including multiplied collapse steps
    pub base_win: u64,
    /// Sum of all free spin wins triggered by this round
    pub free_win: u64,
    /// Collapse steps that paid
    pub collapses: u32,
    /// Free spins played
    pub free_spins: u32,
    /// Free spins awarded in the base spin
    pub free_spins_awarded: u32,
    /// An expansion changed the base window
    pub expanded: bool,
}

impl RoundOutcome {
    /// Total win of the round
    pub fn total_win(&self) -> u64 {
        self.base_win + self.free_win
    }

    /// Check if the round paid anything
    pub fn is_win(&self) -> bool {
        self.total_win() > 0
    }

    /// Win-to-bet ratio
    pub fn win_ratio(&self) -> f64 {
        if self.bet > 0 {
            self.total_win() as f64 / self.bet as f64
        } else {
            0.0
        }
    }
}
