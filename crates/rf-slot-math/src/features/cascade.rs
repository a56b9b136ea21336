//! Collapse and refill
//!
//! ```text
//!   before    clear    gravity    refill
//!     A         A         .          Q
//!     W   ──►   .   ──►   .   ──►    P
//!     B         .         A          A
//! ```
//!
//! Winning cells are cleared, the remaining symbols fall to the bottom of
//! their reel, and the gaps at the top are refilled from the strip by
//! walking the reel's stop position backwards.

use crate::symbols::{NO_SYMBOL, ReelStrip, SymbolId};
use crate::view::{View, WinnersMask};

/// Remove winning cells, compact each reel downward and refill from the strip.
///
/// `stops` holds the strip position of each reel's top cell; it moves up one
/// position per refilled cell, wrapping at the start of the strip.
pub fn collapse(view: &mut View, winners: &WinnersMask, strips: &[ReelStrip], stops: &mut [usize]) {
    for (reel, row, won) in winners.iter() {
        if won {
            view.set(reel, row, NO_SYMBOL);
        }
    }

    for reel in 0..view.reels() {
        let column = view.column_mut(reel);
        compact(column);

        let strip = &strips[reel];
        for cell in column.iter_mut().rev() {
            if *cell != NO_SYMBOL {
                continue;
            }
            stops[reel] = strip.previous(stops[reel]);
            *cell = strip.symbols[stops[reel]];
        }
    }
}

/// Move every symbol to the bottom of the column, keeping their order
fn compact(column: &mut [SymbolId]) {
    let mut write = column.len();
    for read in (0..column.len()).rev() {
        if column[read] == NO_SYMBOL {
            continue;
        }
        write -= 1;
        column[write] = column[read];
    }
    column[..write].fill(NO_SYMBOL);
}
