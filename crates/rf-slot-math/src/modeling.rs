//! Reel modeling helpers
//!
//! Tools for drafting strips before a game is tuned by hand:
//! - [`initial_strips`] seeds every reel from the paytable
//! - [`shuffle_stacked`] / [`shuffle_by_groups`] reorder a strip while
//!   limiting equal neighbours
//! - [`strip_census`] counts symbols per reel

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config::GameConfig;
use crate::error::ModelingError;
use crate::symbols::{ReelStrip, SymbolId, SymbolSet};

/// Shuffle rounds tried before giving up on the repeat limit
pub const MAX_SHUFFLE_ATTEMPTS: usize = 10_000;

/// Build a strip set for `config` with roughly `target_length` cells per reel.
///
/// Each paying symbol gets a share inversely proportional to its summed
/// pays, so the best-paying symbol appears least. Counts are rounded up,
/// which can make the strips slightly longer than asked. Symbols without
/// any pay are left out. Every reel gets the same sorted strip.
pub fn initial_strips(
    config: &GameConfig,
    target_length: usize,
) -> Result<Vec<ReelStrip>, ModelingError> {
    if target_length == 0 {
        return Err(ModelingError::ZeroLength);
    }

    let paytable = &config.paytable;
    let sums: Vec<f64> = (0..paytable.symbol_count())
        .map(|symbol| paytable.total_pay(symbol as SymbolId) as f64)
        .collect();
    let best = sums.iter().copied().fold(0.0, f64::max);
    if best == 0.0 {
        return Err(ModelingError::NothingToPlace);
    }

    // Inverse share of the pays, scaled so the best-paying symbol weighs 1
    let weights: Vec<f64> = sums
        .iter()
        .map(|&sum| if sum > 0.0 { best / sum } else { 0.0 })
        .collect();
    let scale = target_length as f64 / weights.iter().sum::<f64>();

    let mut symbols = Vec::new();
    for (symbol, weight) in weights.iter().enumerate() {
        let count = (weight * scale).ceil() as usize;
        symbols.extend(std::iter::repeat_n(symbol as SymbolId, count));
    }

    log::debug!(
        "Initial strips: {} cells per reel for target {}",
        symbols.len(),
        target_length
    );
    Ok(vec![ReelStrip::new(symbols); config.grid.reels])
}

/// Count equal neighbouring groups, wrapping from the last to the first
fn neighbour_repeats(groups: &[Vec<SymbolId>]) -> usize {
    (0..groups.len())
        .filter(|&i| groups[i][0] == groups[(i + 1) % groups.len()][0])
        .count()
}

fn flatten(groups: Vec<Vec<SymbolId>>) -> ReelStrip {
    ReelStrip::new(groups.into_iter().flatten().collect())
}

/// Reorder a strip in stacks of equal symbols.
///
/// The strip is sorted, cut into stacks of at most `stack_size` equal
/// symbols, and the stacks are shuffled. Stacks equal to their right
/// neighbour are then swapped with random other stacks until at most
/// `repeats` equal neighbouring pairs remain. A `stack_size` of 0 keeps the
/// strip's existing runs instead (see [`shuffle_by_groups`]).
pub fn shuffle_stacked<R: Rng + ?Sized>(
    strip: &ReelStrip,
    stack_size: usize,
    repeats: usize,
    rng: &mut R,
) -> Result<ReelStrip, ModelingError> {
    if stack_size == 0 {
        return shuffle_by_groups(strip, repeats, rng);
    }
    if strip.is_empty() {
        return Ok(strip.clone());
    }

    let mut sorted = strip.symbols.clone();
    sorted.sort_unstable();
    let mut stacks: Vec<Vec<SymbolId>> = sorted
        .chunk_by(|a, b| a == b)
        .flat_map(|run| run.chunks(stack_size))
        .map(<[SymbolId]>::to_vec)
        .collect();
    stacks.shuffle(rng);

    let len = stacks.len();
    for _ in 0..MAX_SHUFFLE_ATTEMPTS {
        if neighbour_repeats(&stacks) <= repeats {
            return Ok(flatten(stacks));
        }

        for i in 0..len {
            let right = (i + 1) % len;
            if stacks[i][0] != stacks[right][0] {
                continue;
            }
            // Other symbols may not exist, so only try a bounded number of picks
            for _ in 0..len {
                let pick = rng.random_range(0..len);
                if stacks[pick][0] != stacks[right][0] {
                    stacks.swap(right, pick);
                    break;
                }
            }
        }
    }

    Err(ModelingError::RepeatLimit {
        reel: 0,
        repeats,
        attempts: MAX_SHUFFLE_ATTEMPTS,
    })
}

/// Shuffle the runs of equal symbols a strip already has.
///
/// Runs are kept intact and reshuffled until at most `repeats` equal
/// neighbouring runs remain.
pub fn shuffle_by_groups<R: Rng + ?Sized>(
    strip: &ReelStrip,
    repeats: usize,
    rng: &mut R,
) -> Result<ReelStrip, ModelingError> {
    if strip.is_empty() {
        return Ok(strip.clone());
    }

    let mut groups: Vec<Vec<SymbolId>> = strip
        .symbols
        .chunk_by(|a, b| a == b)
        .map(<[SymbolId]>::to_vec)
        .collect();

    for _ in 0..MAX_SHUFFLE_ATTEMPTS {
        groups.shuffle(rng);
        if neighbour_repeats(&groups) <= repeats {
            return Ok(flatten(groups));
        }
    }

    Err(ModelingError::RepeatLimit {
        reel: 0,
        repeats,
        attempts: MAX_SHUFFLE_ATTEMPTS,
    })
}

/// Shuffle every strip of a set with [`shuffle_stacked`]
pub fn shuffle_strips<R: Rng + ?Sized>(
    strips: &[ReelStrip],
    stack_size: usize,
    repeats: usize,
    rng: &mut R,
) -> Result<Vec<ReelStrip>, ModelingError> {
    strips
        .iter()
        .enumerate()
        .map(|(reel, strip)| {
            shuffle_stacked(strip, stack_size, repeats, rng).map_err(|err| match err {
                ModelingError::RepeatLimit {
                    repeats, attempts, ..
                } => {
                    log::warn!(
                        "Reel {} keeps more than {} equal neighbours after {} attempts",
                        reel,
                        repeats,
                        attempts
                    );
                    ModelingError::RepeatLimit {
                        reel,
                        repeats,
                        attempts,
                    }
                }
                other => other,
            })
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// CENSUS
// ═══════════════════════════════════════════════════════════════════════════════

/// Symbol counts of a strip set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StripCensus {
    /// `counts[reel][symbol]`
    pub counts: Vec<Vec<usize>>,
    /// Cells per reel
    pub lengths: Vec<usize>,
    /// Product of the strip lengths
    pub combinations: u128,
}

impl StripCensus {
    /// Occurrences of `symbol` on `reel`
    pub fn count(&self, reel: usize, symbol: SymbolId) -> usize {
        self.counts
            .get(reel)
            .and_then(|row| row.get(symbol as usize))
            .copied()
            .unwrap_or(0)
    }
}

/// Count every symbol on every strip
pub fn strip_census(strips: &[ReelStrip], symbols: &SymbolSet) -> StripCensus {
    let counts: Vec<Vec<usize>> = strips
        .iter()
        .map(|strip| {
            let mut row = vec![0; symbols.len()];
            for &symbol in &strip.symbols {
                if let Some(slot) = row.get_mut(symbol as usize) {
                    *slot += 1;
                }
            }
            row
        })
        .collect();

    StripCensus {
        counts,
        lengths: strips.iter().map(ReelStrip::len).collect(),
        combinations: strips.iter().map(|s| s.len() as u128).product(),
    }
}
