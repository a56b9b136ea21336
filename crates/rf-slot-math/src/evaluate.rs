//! Payline and scatter win evaluation
//!
//! ## Line rules
//!
//! ```text
//! [W][W][A][A][B]   anchor = A, run = 4, pays A×4 × wild-in-line multiplier
//! [W][W][W][B][A]   anchor = B, run = 4, or W×3 as a pure wild run if it pays more
//! [S][A][A][A][A]   scatter first: no line win
//! ```
//!
//! - The anchor is the first cell that does not substitute. A scatter or an
//!   empty cell ends the search.
//! - Substituting wilds count as the anchor. If any wild lies inside the
//!   counted run, the wild-in-line multiplier replaces 1×.
//! - When the line starts with a wild, the leading run of each wild symbol
//!   is priced on its own (no multiplier). A strictly higher amount replaces
//!   the anchor result: symbol, count and amount together.

use crate::config::{GameConfig, ScatterPay};
use crate::paytable::Payline;
use crate::spin::WinAttribution;
use crate::symbols::{NO_SYMBOL, SymbolId};
use crate::view::{View, WinnersMask};

/// Reusable result buffers of one evaluation pass
#[derive(Debug, Clone)]
pub struct WinPass {
    /// Cells that contributed to a win
    pub winners: WinnersMask,
    /// Win per payline, both directions summed
    pub line_wins: Vec<u64>,
    /// `(count, symbol, amount)` for every line and scatter hit
    pub attributions: Vec<WinAttribution>,
    /// Sum of line wins
    pub line_total: u64,
    /// Sum of scatter wins
    pub scatter_total: u64,
    line: Vec<SymbolId>,
}

impl WinPass {
    /// Allocate buffers for a game
    pub fn new(game: &GameConfig) -> Self {
        Self {
            winners: WinnersMask::new(game.grid),
            line_wins: vec![0; game.paylines.len()],
            attributions: Vec::with_capacity(game.paylines.len() * 2),
            line_total: 0,
            scatter_total: 0,
            line: Vec::with_capacity(game.grid.reels),
        }
    }

    /// Reset for the next pass
    pub fn clear(&mut self) {
        self.winners.clear();
        self.line_wins.fill(0);
        self.attributions.clear();
        self.line_total = 0;
        self.scatter_total = 0;
    }

    /// Total win of the pass
    pub fn total(&self) -> u64 {
        self.line_total + self.scatter_total
    }

    /// Multiply every amount of the pass (collapse steps, free spins)
    pub fn scale(&mut self, multiplier: u64) {
        if multiplier == 1 {
            return;
        }
        for amount in &mut self.line_wins {
            *amount *= multiplier;
        }
        for hit in &mut self.attributions {
            hit.amount *= multiplier;
        }
        self.line_total *= multiplier;
        self.scatter_total *= multiplier;
    }
}

/// Win evaluator bound to a game
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    game: &'a GameConfig,
    wilds: bool,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator. With `wilds` off, wild symbols are plain symbols.
    pub fn new(game: &'a GameConfig, wilds: bool) -> Self {
        Self { game, wilds }
    }

    #[inline]
    fn substitutes(&self, symbol: SymbolId) -> bool {
        self.wilds && self.game.symbols.substitutes(symbol)
    }

    /// Best win of one line read left to right
    pub fn line_win(&self, line: &[SymbolId], line_bet: u64) -> Option<WinAttribution> {
        let symbols = &self.game.symbols;
        let paytable = &self.game.paytable;

        let first = *line.first()?;
        if first == NO_SYMBOL || symbols.is_scatter(first) {
            return None;
        }

        let anchor = line
            .iter()
            .copied()
            .take_while(|&s| s != NO_SYMBOL && !symbols.is_scatter(s))
            .find(|&s| !self.substitutes(s));

        let mut best: Option<WinAttribution> = None;

        if let Some(anchor) = anchor {
            let mut count = 0;
            let mut with_wild = false;
            for &symbol in line {
                if symbol == anchor {
                    count += 1;
                } else if self.substitutes(symbol) {
                    count += 1;
                    with_wild = true;
                } else {
                    break;
                }
            }
            let multiplier = if with_wild {
                self.game.multipliers.wild_in_line
            } else {
                1
            };
            best = Some(WinAttribution {
                count,
                symbol: anchor,
                amount: paytable.pay(anchor, count) * line_bet * multiplier,
            });
        }

        if self.substitutes(first) {
            for &wild in symbols.wild_ids() {
                if !self.substitutes(wild) {
                    continue;
                }
                let count = line.iter().take_while(|&&s| s == wild).count();
                let amount = paytable.pay(wild, count) * line_bet;
                if amount > best.map_or(0, |b| b.amount) {
                    best = Some(WinAttribution {
                        count,
                        symbol: wild,
                        amount,
                    });
                }
            }
        }

        best.filter(|b| b.amount > 0)
    }

    /// Evaluate every payline, marking winners and per-line amounts
    pub fn lines_win(&self, view: &View, pass: &mut WinPass) -> u64 {
        let line_bet = self.game.line_bet;
        let reels = view.reels();
        let mut total = 0;

        for (index, payline) in self.game.paylines.iter().enumerate() {
            view.line_into(payline, &mut pass.line);
            let mut amount = 0;

            if let Some(hit) = self.line_win(&pass.line, line_bet) {
                mark(&mut pass.winners, payline, 0..hit.count);
                amount += hit.amount;
                pass.attributions.push(hit);
            }

            if self.game.rules.both_ways {
                pass.line.reverse();
                if let Some(hit) = self.line_win(&pass.line, line_bet) {
                    mark(&mut pass.winners, payline, reels - hit.count..reels);
                    amount += hit.amount;
                    pass.attributions.push(hit);
                }
            }

            pass.line_wins[index] = amount;
            total += amount;
        }

        pass.line_total = total;
        total
    }

    /// Line total only, without touching any result buffer
    pub fn lines_total(&self, view: &View, line: &mut Vec<SymbolId>) -> u64 {
        let line_bet = self.game.line_bet;
        let mut total = 0;
        for payline in &self.game.paylines {
            view.line_into(payline, line);
            total += self.line_win(line, line_bet).map_or(0, |h| h.amount);
            if self.game.rules.both_ways {
                line.reverse();
                total += self.line_win(line, line_bet).map_or(0, |h| h.amount);
            }
        }
        total
    }

    /// Evaluate scatters anywhere in the window
    pub fn scatter_win(&self, view: &View, pass: &mut WinPass) -> u64 {
        let game = self.game;
        let mut total = 0;

        for &scatter in game.symbols.scatter_ids() {
            // Counts beyond the reel count are priced as a full house
            let count = view
                .count_where(|s| s == scatter)
                .min(game.paytable.reels());
            let pay = game.paytable.pay(scatter, count);
            if pay == 0 {
                continue;
            }

            let amount = match game.rules.scatter_pay {
                ScatterPay::Stake => pay * game.total_bet() * game.multipliers.scatter,
                ScatterPay::Fixed => pay * game.multipliers.scatter,
            };

            for (reel, row, symbol) in view.iter() {
                if symbol == scatter {
                    pass.winners.mark(reel, row);
                }
            }
            pass.attributions.push(WinAttribution {
                count,
                symbol: scatter,
                amount,
            });
            total += amount;
        }

        pass.scatter_total = total;
        total
    }

    /// Full pass: clear, then lines and scatters
    pub fn evaluate(&self, view: &View, pass: &mut WinPass) -> u64 {
        pass.clear();
        self.lines_win(view, pass);
        self.scatter_win(view, pass);
        pass.total()
    }
}

fn mark(winners: &mut WinnersMask, payline: &Payline, reels: std::ops::Range<usize>) {
    for reel in reels {
        winners.mark(reel, payline.rows[reel]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridSpec, Multipliers};
    use crate::paytable::PayTable;
    use crate::symbols::{ReelStrip, Symbol, SymbolKind, SymbolSet};

    const A: SymbolId = 0;
    const B: SymbolId = 1;
    const W: SymbolId = 2;
    const S: SymbolId = 3;

    fn game() -> GameConfig {
        let symbols = SymbolSet::new(vec![
            Symbol::regular(A, "A"),
            Symbol::regular(B, "B"),
            Symbol::new(W, "W", &[SymbolKind::Wild]),
            Symbol::new(S, "S", &[SymbolKind::Scatter]),
        ]);
        let paytable = PayTable::new(5, 4)
            .with_row(A, &[0, 0, 5, 10, 20])
            .with_row(B, &[0, 0, 2, 4, 8])
            .with_row(W, &[0, 0, 50, 100, 500])
            .with_row(S, &[0, 0, 5, 10, 50]);
        GameConfig::new(
            "eval",
            GridSpec::new(5, 1),
            symbols,
            paytable,
            vec![Payline::straight(0, 5)],
            vec![ReelStrip::new(vec![A]); 5],
        )
        .with_multipliers(Multipliers {
            wild_in_line: 2,
            ..Default::default()
        })
    }

    fn hit(game: &GameConfig, line: &[SymbolId]) -> Option<(SymbolId, usize, u64)> {
        Evaluator::new(game, true)
            .line_win(line, 1)
            .map(|h| (h.symbol, h.count, h.amount))
    }

    #[test]
    fn test_plain_run() {
        let game = game();
        assert_eq!(hit(&game, &[A, A, A, B, A]), Some((A, 3, 5)));
        assert_eq!(hit(&game, &[A, A, B, A, A]), None);
    }

    #[test]
    fn test_wild_substitution_applies_multiplier() {
        let game = game();
        assert_eq!(hit(&game, &[A, W, A, A, B]), Some((A, 4, 20)));
        // Wild outside the run does not count
        assert_eq!(hit(&game, &[A, A, A, B, W]), Some((A, 3, 5)));
    }

    #[test]
    fn test_scatter_first_pays_nothing() {
        let game = game();
        assert_eq!(hit(&game, &[S, A, A, A, A]), None);
    }

    #[test]
    fn test_scatter_stops_anchor_search() {
        let game = game();
        // No anchor before the scatter, so only the wild run can pay
        assert_eq!(hit(&game, &[W, W, S, A, A]), None);
        assert_eq!(hit(&game, &[W, W, W, S, A]), Some((W, 3, 50)));
    }

    #[test]
    fn test_wild_run_beats_weak_substitution() {
        let game = game();
        // B×4 with wild = 4×2 = 8, W×3 = 50
        assert_eq!(hit(&game, &[W, W, W, B, A]), Some((W, 3, 50)));
        // All wild: W×5 = 500 beats nothing
        assert_eq!(hit(&game, &[W, W, W, W, W]), Some((W, 5, 500)));
    }

    #[test]
    fn test_substitution_beats_weak_wild_run() {
        let mut game = game();
        game.paytable.set_row(W, &[0, 0, 1, 1, 1]);
        // A×5 with wild = 20×2 = 40, W×2 pays 0
        assert_eq!(hit(&game, &[W, W, A, A, A]), Some((A, 5, 40)));
    }

    #[test]
    fn test_wilds_off() {
        let game = game();
        let eval = Evaluator::new(&game, false);
        assert!(eval.line_win(&[A, W, A, A, B], 1).is_none());
        let h = eval.line_win(&[W, W, W, A, A], 1).unwrap();
        assert_eq!((h.symbol, h.count, h.amount), (W, 3, 50));
    }

    #[test]
    fn test_empty_cell_ends_line() {
        let game = game();
        assert_eq!(hit(&game, &[NO_SYMBOL, A, A, A, A]), None);
        assert_eq!(hit(&game, &[A, A, A, NO_SYMBOL, A]), Some((A, 3, 5)));
    }

    #[test]
    fn test_both_ways() {
        let mut game = game();
        game.rules.both_ways = true;
        let view = View::from_rows(&[vec![B, A, A, A, A]]);
        let mut pass = WinPass::new(&game);
        let eval = Evaluator::new(&game, true);
        assert_eq!(eval.evaluate(&view, &mut pass), 10);
        assert_eq!(pass.line_wins, vec![10]);
        assert!(!pass.winners.get(0, 0));
        assert!(pass.winners.get(1, 0));

        // Full line pays in both directions
        let view = View::from_rows(&[vec![A; 5]]);
        assert_eq!(eval.evaluate(&view, &mut pass), 40);
        assert_eq!(pass.attributions.len(), 2);
        assert_eq!(eval.lines_total(&view, &mut Vec::new()), 40);
    }

    #[test]
    fn test_scatter_win_stake_and_fixed() {
        let mut game = game();
        game.grid = GridSpec::new(5, 2);
        game.paylines = vec![Payline::straight(0, 5), Payline::straight(1, 5)];
        let view = View::from_rows(&[vec![S, B, A, S, B], vec![A, S, B, A, A]]);
        let mut pass = WinPass::new(&game);

        let total = Evaluator::new(&game, true).evaluate(&view, &mut pass);
        // 5 × total bet of 2
        assert_eq!(total, 10);
        assert_eq!(pass.scatter_total, 10);
        assert_eq!(pass.winners.marked(), 3);
        assert_eq!(pass.attributions[0].count, 3);

        game.rules.scatter_pay = ScatterPay::Fixed;
        game.multipliers.scatter = 3;
        let total = Evaluator::new(&game, true).evaluate(&view, &mut pass);
        assert_eq!(total, 15);
    }

    #[test]
    fn test_total_is_lines_plus_scatters() {
        let mut game = game();
        game.grid = GridSpec::new(5, 2);
        game.paylines = vec![Payline::straight(0, 5), Payline::straight(1, 5)];
        let view = View::from_rows(&[vec![A, A, A, S, B], vec![S, S, B, B, B]]);
        let mut pass = WinPass::new(&game);
        let total = Evaluator::new(&game, true).evaluate(&view, &mut pass);
        assert_eq!(total, pass.line_wins.iter().sum::<u64>() + pass.scatter_total);
        assert_eq!(pass.line_total, 5);
        assert_eq!(pass.scatter_total, 10);
    }
}
