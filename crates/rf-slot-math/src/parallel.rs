//! Parallel runs
//!
//! Work is split into one contiguous share per worker. Each worker owns a
//! [`SlotEngine`] (its own buffers, generator and statistics); the
//! statistics are merged once all workers finish.
//!
//! ```text
//!            ┌─► worker 0: rounds [0, n/k)        seed + 0 ─┐
//! options ───┼─► worker 1: rounds [n/k, 2n/k)     seed + 1 ─┼─► merge ─► Statistics
//!            └─► worker k-1: ...                           ─┘
//! ```
//!
//! Brute force shares are disjoint index ranges of the stop odometer, so the
//! merged enumeration covers every combination exactly once.

use std::ops::Range;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::{GameConfig, RunOptions};
use crate::engine::{EngineSwitches, SlotEngine};
use crate::error::ConfigResult;
use crate::stats::Statistics;

/// Split `[0, total)` into `workers` contiguous ranges.
///
/// Earlier ranges take the remainder, so lengths differ by at most one.
pub fn split_range(total: u128, workers: usize) -> Vec<Range<u128>> {
    let workers = workers.max(1) as u128;
    let share = total / workers;
    let remainder = total % workers;

    let mut start = 0;
    (0..workers)
        .map(|index| {
            let length = share + u128::from(index < remainder);
            let range = start..start + length;
            start += length;
            range
        })
        .collect()
}

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct SimulationRun {
    /// Merged statistics of all workers
    pub statistics: Statistics,
    /// Workers used
    pub workers: usize,
    /// Seed the workers were derived from (None for brute force)
    pub seed: Option<u64>,
    /// Wall time in seconds
    pub elapsed_secs: f64,
}

/// Run a Monte Carlo simulation or a brute force enumeration.
///
/// The config is validated once before any worker starts.
pub fn run(config: &GameConfig, options: &RunOptions) -> ConfigResult<SimulationRun> {
    config.validate()?;
    let start = Instant::now();
    let workers = options.workers.max(1);
    let switches = EngineSwitches::from(options);

    let (statistics, seed) = if options.brute_force {
        let total = config.base_combinations();
        log::info!(
            "Brute force over {} combinations with {} worker(s)",
            total,
            workers
        );
        let stats = merge_all(
            split_range(total, workers)
                .into_par_iter()
                .map(|range| {
                    let mut engine = SlotEngine::from_validated(config.clone(), switches, Some(0));
                    engine.brute_force_range(range);
                    engine.into_stats()
                })
                .collect(),
            config,
        );
        (stats, None)
    } else {
        let seed = options.seed.unwrap_or_else(rand::random);
        log::info!(
            "Monte Carlo over {} rounds with {} worker(s), seed {}",
            options.rounds,
            workers,
            seed
        );
        let stats = merge_all(
            split_range(u128::from(options.rounds), workers)
                .into_par_iter()
                .enumerate()
                .map(|(index, range)| {
                    let worker_seed = seed.wrapping_add(index as u64);
                    let mut engine =
                        SlotEngine::from_validated(config.clone(), switches, Some(worker_seed));
                    engine.simulate((range.end - range.start) as u64);
                    engine.into_stats()
                })
                .collect(),
            config,
        );
        (stats, Some(seed))
    };

    let elapsed_secs = start.elapsed().as_secs_f64();
    log::debug!("Run finished in {:.3}s", elapsed_secs);

    Ok(SimulationRun {
        statistics,
        workers,
        seed,
        elapsed_secs,
    })
}

fn merge_all(parts: Vec<Statistics>, config: &GameConfig) -> Statistics {
    let mut merged = Statistics::new(config.grid.reels, config.symbols.len());
    for part in &parts {
        merged.merge(part);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;
    use crate::error::ConfigError;
    use crate::paytable::{PayTable, Payline};
    use crate::symbols::{ReelStrip, Symbol, SymbolSet};

    fn game() -> GameConfig {
        let symbols = SymbolSet::new(vec![Symbol::regular(0, "A"), Symbol::regular(1, "B")]);
        let paytable = PayTable::new(3, 2)
            .with_row(0, &[0, 0, 8])
            .with_row(1, &[0, 2, 3]);
        GameConfig::new(
            "parallel",
            GridSpec::new(3, 1),
            symbols,
            paytable,
            vec![Payline::straight(0, 3)],
            vec![
                ReelStrip::new(vec![0, 1, 1]),
                ReelStrip::new(vec![0, 1]),
                ReelStrip::new(vec![1, 0, 1, 0]),
            ],
        )
    }

    #[test]
    fn test_split_range() {
        let ranges = split_range(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
        assert_eq!(split_range(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
        assert_eq!(split_range(5, 0), vec![0..5]);
    }

    #[test]
    fn test_brute_force_independent_of_workers() {
        let game = game();
        let single = run(&game, &RunOptions::default().brute_force()).unwrap();
        let split = run(&game, &RunOptions::default().brute_force().with_workers(5)).unwrap();

        assert_eq!(single.statistics.base.games, 24);
        assert_eq!(split.statistics.base.games, 24);
        assert_eq!(single.statistics.base.money, split.statistics.base.money);
        assert_eq!(single.statistics.base.hits, split.statistics.base.hits);
        assert_eq!(single.statistics.base.histogram, split.statistics.base.histogram);
    }

    #[test]
    fn test_monte_carlo_deterministic_for_seed() {
        let game = game();
        let options = RunOptions::default()
            .with_rounds(5000)
            .with_seed(11)
            .with_workers(3);
        let a = run(&game, &options).unwrap();
        let b = run(&game, &options).unwrap();

        assert_eq!(a.seed, Some(11));
        assert_eq!(a.statistics.base.games, 5000);
        assert_eq!(a.statistics.wagered, 5000);
        assert_eq!(a.statistics.base.money, b.statistics.base.money);
        assert_eq!(a.statistics.base.histogram, b.statistics.base.histogram);
    }

    #[test]
    fn test_rejects_missing_strip() {
        let mut game = game();
        game.base_reels.pop();
        let err = run(&game, &RunOptions::default().with_rounds(10)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::StripCount {
                set: "base",
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_rejects_empty_strip_in_brute_force() {
        let mut game = game();
        game.base_reels[1] = ReelStrip::new(Vec::new());
        let err = run(&game, &RunOptions::default().brute_force()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyStrip { set: "base", reel: 1 }));
    }
}
