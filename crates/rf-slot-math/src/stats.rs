//! Statistics accumulator and report
//!
//! [`Statistics`] holds only additive counters and maxima, so accumulators
//! from independent workers merge by summation. Every ratio is derived on
//! demand in [`Statistics::report`]; a ratio with a zero denominator is
//! `NaN`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::HistogramSpec;
use crate::features::TriggerOutcome;
use crate::spin::WinAttribution;
use crate::symbols::SymbolSet;

/// Game phase a win belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Base,
    Free,
}

/// Count, sum and sum of squares of an outcome list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Moments {
    pub count: u64,
    pub sum: u128,
    pub sum_squares: u128,
}

impl Moments {
    /// Add one outcome
    #[inline]
    pub fn push(&mut self, value: u64) {
        let value = value as u128;
        self.count += 1;
        self.sum += value;
        self.sum_squares += value * value;
    }

    /// Fold in another list
    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_squares += other.sum_squares;
    }

    /// Arithmetic mean, `NaN` for an empty list
    pub fn mean(&self) -> f64 {
        ratio(self.sum as f64, self.count as f64)
    }

    /// Population standard deviation, `NaN` for an empty list
    pub fn std_dev(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        // n·Σx² − (Σx)² is exact in integers and never negative
        let n = self.count as u128;
        let spread = n * self.sum_squares - self.sum * self.sum;
        (spread as f64 / (n * n) as f64).sqrt()
    }
}

/// Counters of one phase
#[derive(Debug, Clone)]
pub struct PhaseStats {
    /// Rounds (base) or spins (free) played
    pub games: u64,
    /// Games with a nonzero win
    pub hits: u64,
    /// Money won
    pub money: u64,
    /// Largest single win
    pub max_win: u64,
    /// Outcome moments for mean and deviation
    pub outcomes: Moments,
    /// Exact win amount → occurrences, nonzero wins only
    pub histogram: BTreeMap<u64, u64>,
    symbols: usize,
    /// `[count * symbols + symbol]`
    symbol_money: Vec<u64>,
    symbol_hits: Vec<u64>,
}

impl PhaseStats {
    /// Create zeroed counters for counts `0..=reels`
    pub fn new(reels: usize, symbols: usize) -> Self {
        Self {
            games: 0,
            hits: 0,
            money: 0,
            max_win: 0,
            outcomes: Moments::default(),
            histogram: BTreeMap::new(),
            symbols,
            symbol_money: vec![0; (reels + 1) * symbols],
            symbol_hits: vec![0; (reels + 1) * symbols],
        }
    }

    /// Money won by `count` of `symbol`
    pub fn symbol_money(&self, symbol: usize, count: usize) -> u64 {
        self.symbol_money
            .get(count * self.symbols + symbol)
            .copied()
            .unwrap_or(0)
    }

    /// Hits of `count` of `symbol`
    pub fn symbol_hits(&self, symbol: usize, count: usize) -> u64 {
        self.symbol_hits
            .get(count * self.symbols + symbol)
            .copied()
            .unwrap_or(0)
    }

    fn record_symbols(&mut self, attributions: &[WinAttribution]) {
        for hit in attributions {
            let idx = hit.count * self.symbols + hit.symbol as usize;
            if let (Some(money), Some(hits)) = (
                self.symbol_money.get_mut(idx),
                self.symbol_hits.get_mut(idx),
            ) {
                *money += hit.amount;
                *hits += 1;
            }
        }
    }

    fn record_outcome(&mut self, win: u64) {
        self.games += 1;
        self.money += win;
        self.max_win = self.max_win.max(win);
        self.outcomes.push(win);
        if win > 0 {
            self.hits += 1;
            *self.histogram.entry(win).or_insert(0) += 1;
        }
    }

    fn merge(&mut self, other: &Self) {
        self.games += other.games;
        self.hits += other.hits;
        self.money += other.money;
        self.max_win = self.max_win.max(other.max_win);
        self.outcomes.merge(&other.outcomes);
        for (&win, &count) in &other.histogram {
            *self.histogram.entry(win).or_insert(0) += count;
        }
        for (a, b) in self.symbol_money.iter_mut().zip(&other.symbol_money) {
            *a += b;
        }
        for (a, b) in self.symbol_hits.iter_mut().zip(&other.symbol_hits) {
            *a += b;
        }
    }

    /// Histogram grouped into growing buckets.
    ///
    /// Buckets are `[0, initial)`, then each upper bound is the previous one
    /// doubled plus `increment`, until the largest win is covered.
    pub fn buckets(&self, spec: &HistogramSpec) -> Vec<HistogramBucket> {
        let Some(&largest) = self.histogram.keys().next_back() else {
            return Vec::new();
        };

        let mut buckets = Vec::new();
        let mut lower = 0;
        let mut upper = spec.initial_bin.max(1);
        while lower <= largest {
            let count = self.histogram.range(lower..upper).map(|(_, c)| c).sum();
            buckets.push(HistogramBucket {
                lower,
                upper,
                count,
            });
            lower = upper;
            upper = upper.saturating_mul(2).saturating_add(spec.increment);
            if upper == lower {
                break;
            }
        }
        buckets
    }
}

/// Process-wide accumulator of one run
#[derive(Debug, Clone)]
pub struct Statistics {
    /// Base game counters
    pub base: PhaseStats,
    /// Free spins counters
    pub free: PhaseStats,
    /// Money staked
    pub wagered: u64,
    /// Free spins awarded from the base game
    pub free_starts: u64,
    /// Free spins awarded during free spins
    pub free_restarts: u64,
    /// Most free spins played after one base spin
    pub max_free_spins_run: u32,
    /// Longest chain of paying collapses
    pub max_collapses: u32,
}

impl Statistics {
    /// Create zeroed statistics for a game shape
    pub fn new(reels: usize, symbols: usize) -> Self {
        Self {
            base: PhaseStats::new(reels, symbols),
            free: PhaseStats::new(reels, symbols),
            wagered: 0,
            free_starts: 0,
            free_restarts: 0,
            max_free_spins_run: 0,
            max_collapses: 0,
        }
    }

    /// Counters of a phase
    pub fn phase(&self, phase: Phase) -> &PhaseStats {
        match phase {
            Phase::Base => &self.base,
            Phase::Free => &self.free,
        }
    }

    fn phase_mut(&mut self, phase: Phase) -> &mut PhaseStats {
        match phase {
            Phase::Base => &mut self.base,
            Phase::Free => &mut self.free,
        }
    }

    /// Money won in both phases
    pub fn won(&self) -> u64 {
        self.base.money + self.free.money
    }

    /// Add a stake
    pub fn record_wager(&mut self, amount: u64) {
        self.wagered += amount;
    }

    /// Record one finished game: its win and the wins behind it
    pub fn record_round(&mut self, phase: Phase, win: u64, attributions: &[WinAttribution]) {
        let stats = self.phase_mut(phase);
        stats.record_symbols(attributions);
        stats.record_outcome(win);
    }

    /// Record per-symbol wins of an intermediate pass (a collapse step)
    pub fn record_symbols(&mut self, phase: Phase, attributions: &[WinAttribution]) {
        self.phase_mut(phase).record_symbols(attributions);
    }

    /// Record a game's win without attributions
    pub fn record_outcome(&mut self, phase: Phase, win: u64) {
        self.phase_mut(phase).record_outcome(win);
    }

    /// Count a free spins award
    pub fn record_trigger(&mut self, outcome: TriggerOutcome) {
        match outcome {
            TriggerOutcome::None => {}
            TriggerOutcome::Start(_) => self.free_starts += 1,
            TriggerOutcome::Restart(_) => self.free_restarts += 1,
        }
    }

    /// Update per-round maxima
    pub fn record_run(&mut self, free_spins: u32, collapses: u32) {
        self.max_free_spins_run = self.max_free_spins_run.max(free_spins);
        self.max_collapses = self.max_collapses.max(collapses);
    }

    /// Fold another accumulator in: sums, maxima by max
    pub fn merge(&mut self, other: &Self) {
        self.base.merge(&other.base);
        self.free.merge(&other.free);
        self.wagered += other.wagered;
        self.free_starts += other.free_starts;
        self.free_restarts += other.free_restarts;
        self.max_free_spins_run = self.max_free_spins_run.max(other.max_free_spins_run);
        self.max_collapses = self.max_collapses.max(other.max_collapses);
    }

    /// Derive the report
    pub fn report(&self, symbols: &SymbolSet, histogram: &HistogramSpec) -> StatisticsReport {
        let wagered = self.wagered as f64;
        let games = self.base.games as f64;

        StatisticsReport {
            games: self.base.games,
            free_spins: self.free.games,
            free_starts: self.free_starts,
            free_restarts: self.free_restarts,
            wagered: self.wagered,
            won: self.won(),
            base_money: self.base.money,
            free_money: self.free.money,
            total_rtp: ratio(self.won() as f64, wagered),
            base_rtp: ratio(self.base.money as f64, wagered),
            free_rtp: ratio(self.free.money as f64, wagered),
            base_hit_frequency: ratio(self.base.hits as f64, games),
            free_hit_frequency: ratio(self.free.hits as f64, self.free.games as f64),
            base_to_free_frequency: ratio(self.free_starts as f64, games),
            free_to_free_frequency: ratio(self.free_restarts as f64, self.free_starts as f64),
            max_base_win: self.base.max_win,
            max_free_win: self.free.max_win,
            max_free_spins_run: self.max_free_spins_run,
            max_collapses: self.max_collapses,
            base_mean: self.base.outcomes.mean(),
            base_std_dev: self.base.outcomes.std_dev(),
            free_mean: self.free.outcomes.mean(),
            free_std_dev: self.free.outcomes.std_dev(),
            base_histogram: self.base.buckets(histogram),
            free_histogram: self.free.buckets(histogram),
            base_symbols: symbol_table(&self.base, symbols, self.wagered),
            free_symbols: symbol_table(&self.free, symbols, self.wagered),
        }
    }
}

fn symbol_table(stats: &PhaseStats, symbols: &SymbolSet, wagered: u64) -> Vec<SymbolStats> {
    let counts = stats.symbol_money.len() / stats.symbols.max(1);
    symbols
        .symbols()
        .iter()
        .map(|symbol| {
            let id = symbol.id as usize;
            let money: Vec<u64> = (0..counts).map(|c| stats.symbol_money(id, c)).collect();
            let hits: Vec<u64> = (0..counts).map(|c| stats.symbol_hits(id, c)).collect();
            SymbolStats {
                name: symbol.name.clone(),
                rtp: money.iter().map(|&m| ratio(m as f64, wagered as f64)).collect(),
                share: money
                    .iter()
                    .map(|&m| ratio(m as f64, stats.money as f64))
                    .collect(),
                hit_frequency: hits
                    .iter()
                    .map(|&h| ratio(h as f64, stats.games as f64))
                    .collect(),
                hits,
            }
        })
        .collect()
}

/// `a / b`, or `NaN` when `b` is zero
#[inline]
pub fn ratio(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::NAN } else { a / b }
}

/// One histogram bucket `[lower, upper)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub lower: u64,
    pub upper: u64,
    pub count: u64,
}

/// Per-symbol breakdown, each vector indexed by count of a kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolStats {
    pub name: String,
    /// Money over total wagered
    pub rtp: Vec<f64>,
    /// Money over the phase's money
    pub share: Vec<f64>,
    /// Hit count
    pub hits: Vec<u64>,
    /// Hits over the phase's games
    pub hit_frequency: Vec<f64>,
}

/// Statistics snapshot for formatters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub games: u64,
    pub free_spins: u64,
    pub free_starts: u64,
    pub free_restarts: u64,
    pub wagered: u64,
    pub won: u64,
    pub base_money: u64,
    pub free_money: u64,
    pub total_rtp: f64,
    pub base_rtp: f64,
    pub free_rtp: f64,
    pub base_hit_frequency: f64,
    pub free_hit_frequency: f64,
    pub base_to_free_frequency: f64,
    pub free_to_free_frequency: f64,
    pub max_base_win: u64,
    pub max_free_win: u64,
    pub max_free_spins_run: u32,
    pub max_collapses: u32,
    pub base_mean: f64,
    pub base_std_dev: f64,
    pub free_mean: f64,
    pub free_std_dev: f64,
    pub base_histogram: Vec<HistogramBucket>,
    pub free_histogram: Vec<HistogramBucket>,
    pub base_symbols: Vec<SymbolStats>,
    pub free_symbols: Vec<SymbolStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn attribution(count: usize, symbol: u32, amount: u64) -> WinAttribution {
        WinAttribution {
            count,
            symbol,
            amount,
        }
    }

    #[test]
    fn test_moments_all_zero() {
        let mut m = Moments::default();
        for _ in 0..10 {
            m.push(0);
        }
        assert_eq!(m.mean(), 0.0);
        assert_eq!(m.std_dev(), 0.0);
    }

    #[test]
    fn test_moments_empty_is_nan() {
        let m = Moments::default();
        assert!(m.mean().is_nan());
        assert!(m.std_dev().is_nan());
    }

    #[test]
    fn test_moments_population_formula() {
        let mut m = Moments::default();
        for v in [2, 4, 4, 4, 5, 5, 7, 9] {
            m.push(v);
        }
        assert_relative_eq!(m.mean(), 5.0);
        assert_relative_eq!(m.std_dev(), 2.0);
    }

    #[test]
    fn test_record_round() {
        let mut stats = Statistics::new(3, 2);
        stats.record_wager(10);
        stats.record_round(Phase::Base, 6, &[attribution(3, 1, 6)]);
        stats.record_wager(10);
        stats.record_round(Phase::Base, 0, &[]);

        assert_eq!(stats.base.games, 2);
        assert_eq!(stats.base.hits, 1);
        assert_eq!(stats.base.symbol_money(1, 3), 6);
        assert_eq!(stats.base.symbol_hits(1, 3), 1);

        let report = stats.report(&SymbolSet::new(Vec::new()), &HistogramSpec::default());
        assert_relative_eq!(report.total_rtp, 0.3);
        assert_relative_eq!(report.base_hit_frequency, 0.5);
        assert!(report.free_hit_frequency.is_nan());
        assert!(report.free_to_free_frequency.is_nan());
    }

    #[test]
    fn test_empty_report_is_nan() {
        let report = Statistics::new(5, 0).report(&SymbolSet::new(Vec::new()), &HistogramSpec::default());
        assert!(report.total_rtp.is_nan());
        assert!(report.base_mean.is_nan());
        assert!(report.base_histogram.is_empty());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"total_rtp\":null"));
    }

    #[test]
    fn test_histogram_buckets_cover_all_wins() {
        let mut stats = PhaseStats::new(5, 1);
        for win in [1, 1, 3, 7, 8, 100] {
            stats.record_outcome(win);
        }
        stats.record_outcome(0);

        let buckets = stats.buckets(&HistogramSpec {
            initial_bin: 2,
            increment: 1,
        });
        // [0,2) [2,5) [5,11) [11,23) [23,47) [47,95) [95,191)
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[2].count, 2);
        assert_eq!(buckets[6].count, 1);
        let total: u64 = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, stats.hits);
    }

    #[test]
    fn test_merge() {
        let mut a = Statistics::new(3, 2);
        a.record_wager(5);
        a.record_round(Phase::Base, 4, &[attribution(2, 0, 4)]);
        a.record_run(3, 1);

        let mut b = Statistics::new(3, 2);
        b.record_wager(5);
        b.record_round(Phase::Base, 9, &[attribution(2, 0, 9)]);
        b.record_round(Phase::Free, 2, &[]);
        b.record_trigger(TriggerOutcome::Start(10));
        b.record_run(10, 0);

        a.merge(&b);
        assert_eq!(a.wagered, 10);
        assert_eq!(a.base.games, 2);
        assert_eq!(a.base.max_win, 9);
        assert_eq!(a.base.symbol_money(0, 2), 13);
        assert_eq!(a.base.histogram.get(&4), Some(&1));
        assert_eq!(a.base.histogram.get(&9), Some(&1));
        assert_eq!(a.free.games, 1);
        assert_eq!(a.free_starts, 1);
        assert_eq!(a.max_free_spins_run, 10);
        assert_eq!(a.max_collapses, 1);
        assert_relative_eq!(a.base.outcomes.mean(), 6.5);
    }
}
