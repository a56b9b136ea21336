//! Wild expansion strategies
//!
//! Every strategy rewrites the view in place and reports whether any cell
//! actually changed. Strategies that need to look before they commit work on
//! a scratch view and swap it in on success.

use crate::config::{GameConfig, WildExpansion};
use crate::evaluate::Evaluator;
use crate::symbols::{NO_SYMBOL, SymbolId};
use crate::view::View;

/// Applies the configured [`WildExpansion`] to a view
#[derive(Debug, Clone, Copy)]
pub struct WildExpander<'a> {
    game: &'a GameConfig,
    evaluator: Evaluator<'a>,
    substitute: SymbolId,
}

impl<'a> WildExpander<'a> {
    /// Create an expander using the game's substitute wild
    pub fn new(game: &'a GameConfig, evaluator: Evaluator<'a>) -> Self {
        Self {
            game,
            evaluator,
            substitute: game.substitute_wild().unwrap_or(NO_SYMBOL),
        }
    }

    /// Wild written into expanded cells
    pub fn substitute(&self) -> SymbolId {
        self.substitute
    }

    /// Run one strategy
    pub fn expand(
        &self,
        strategy: WildExpansion,
        view: &mut View,
        scratch: &mut View,
        line: &mut Vec<SymbolId>,
    ) -> bool {
        if strategy != WildExpansion::None && self.substitute == NO_SYMBOL {
            return false;
        }
        match strategy {
            WildExpansion::None => false,
            WildExpansion::CascadingReveal => self.cascading_reveal(view, line),
            WildExpansion::Neighborhood => self.neighborhood(view, scratch),
            WildExpansion::FullReel => self.full_reel(view, scratch, line),
            WildExpansion::RowWide => self.row_wide(view),
        }
    }

    /// Reveal wilds on winning lines reel by reel.
    ///
    /// A wild inside a line's winning run, on a reel right of the frontier,
    /// fills its reel. The frontier moves to that reel and the scan restarts
    /// from the first line. Reel 0 never expands, and the frontier only moves
    /// right, so there are fewer than `reels` restarts.
    pub fn cascading_reveal(&self, view: &mut View, line: &mut Vec<SymbolId>) -> bool {
        let symbols = &self.game.symbols;
        let line_bet = self.game.line_bet;
        let mut frontier = 0;
        let mut changed = false;

        'scan: loop {
            for payline in &self.game.paylines {
                view.line_into(payline, line);
                let Some(hit) = self.evaluator.line_win(line, line_bet) else {
                    continue;
                };
                let reveal = (frontier + 1..hit.count).find(|&reel| symbols.is_wild(line[reel]));
                if let Some(reel) = reveal {
                    let wild = line[reel];
                    changed |= view.column(reel).iter().any(|&s| s != wild);
                    view.fill_column(reel, wild);
                    frontier = reel;
                    continue 'scan;
                }
            }
            break;
        }

        changed
    }

    /// Extending wilds overwrite their 3×3 neighbourhood with the substitute.
    ///
    /// Extending wilds are found on a snapshot, so cells written during the
    /// pass do not spread again. Scatters are never overwritten.
    pub fn neighborhood(&self, view: &mut View, snapshot: &mut View) -> bool {
        let symbols = &self.game.symbols;
        let (reels, rows) = (view.reels(), view.rows());
        snapshot.copy_from(view);
        let mut changed = false;

        for (reel, row, symbol) in snapshot.iter() {
            if !symbols.is_extending(symbol) {
                continue;
            }
            for r in reel.saturating_sub(1)..(reel + 2).min(reels) {
                for w in row.saturating_sub(1)..(row + 2).min(rows) {
                    let current = snapshot.get(r, w);
                    if symbols.is_scatter(current) {
                        continue;
                    }
                    changed |= view.get(r, w) != self.substitute;
                    view.set(r, w, self.substitute);
                }
            }
        }

        changed
    }

    /// Fill every reel holding the substitute wild, on the scratch view.
    ///
    /// The scratch view replaces the real one only if at least one reel
    /// changed and the expanded window pays on lines.
    pub fn full_reel(&self, view: &mut View, scratch: &mut View, line: &mut Vec<SymbolId>) -> bool {
        if !self.try_full_reel(view, scratch) {
            return false;
        }
        if self.evaluator.lines_total(scratch, line) == 0 {
            return false;
        }
        std::mem::swap(view, scratch);
        true
    }

    /// Expand into `scratch`. Returns true if any reel changed.
    fn try_full_reel(&self, view: &View, scratch: &mut View) -> bool {
        scratch.copy_from(view);
        let mut expanded = false;
        for reel in 0..view.reels() {
            let column = view.column(reel);
            if column.contains(&self.substitute) && column.iter().any(|&s| s != self.substitute) {
                scratch.fill_column(reel, self.substitute);
                expanded = true;
            }
        }
        expanded
    }

    /// Reels partly covered by the substitute wild fill with it
    pub fn row_wide(&self, view: &mut View) -> bool {
        let mut changed = false;
        for reel in 0..view.reels() {
            let wilds = view
                .column(reel)
                .iter()
                .filter(|&&s| s == self.substitute)
                .count();
            if wilds == 0 || wilds == view.rows() {
                continue;
            }
            view.fill_column(reel, self.substitute);
            changed = true;
        }
        changed
    }
}

/// Carry extending wilds from the previous window into a fresh spin
pub fn restore_sticky_wilds(game: &GameConfig, previous: &View, view: &mut View) {
    for (reel, row, symbol) in previous.iter() {
        if game.symbols.is_extending(symbol) {
            view.set(reel, row, symbol);
        }
    }
}
