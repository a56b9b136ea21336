//! Slot Engine: Round driver
//!
//! One base round runs:
//!
//! ```text
//! spin ─► expand ─► evaluate ─► collapse loop ─► trigger check ─► free spins
//!                                (base only)                      (each: spin ─►
//!                                                                  expand ─► evaluate
//!                                                                  ─► retrigger check,
//!                                                                  up to max_free_spins)
//! ```
//!
//! All buffers (view, winners, per-line wins, stops) are owned by the engine
//! and reused across rounds. After a round they hold the state of the last
//! evaluated window, which is what an interactive front end displays.

use std::ops::Range;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{GameConfig, RunOptions};
use crate::error::ConfigResult;
use crate::evaluate::{Evaluator, WinPass};
use crate::features::{FreeSpinState, WildExpander, collapse, restore_sticky_wilds};
use crate::spin::{Odometer, RoundOutcome, WinAttribution, spin_at, spin_random};
use crate::stats::{Phase, Statistics};
use crate::symbols::SymbolId;
use crate::view::{View, WinnersMask};

/// Switches that change play without touching the game definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSwitches {
    /// Wilds substitute on lines
    pub wilds: bool,
    /// Free spins can be awarded
    pub free_spins: bool,
    /// Rounds between progress log lines (0 = silent)
    pub progress_interval: u64,
}

impl Default for EngineSwitches {
    fn default() -> Self {
        Self {
            wilds: true,
            free_spins: true,
            progress_interval: 0,
        }
    }
}

impl From<&RunOptions> for EngineSwitches {
    fn from(options: &RunOptions) -> Self {
        Self {
            wilds: !options.wilds_off,
            free_spins: !options.free_spins_off && !options.brute_force,
            progress_interval: options.progress_interval,
        }
    }
}

/// Slot simulation engine
///
/// Owns a validated [`GameConfig`], a seeded generator, every round buffer
/// and the [`Statistics`] accumulator of the run.
pub struct SlotEngine {
    config: GameConfig,
    switches: EngineSwitches,
    rng: ChaCha8Rng,
    /// Window being played
    view: View,
    /// Expansion scratch space
    scratch: View,
    /// Previous free spin window, for sticky wilds
    previous: View,
    /// Result buffers of the last evaluation
    pass: WinPass,
    /// Strip position of each reel's top cell
    stops: Vec<usize>,
    line: Vec<SymbolId>,
    free: FreeSpinState,
    stats: Statistics,
    rounds: u64,
}

impl SlotEngine {
    /// Create an engine. Fails if the config does not pass
    /// [`GameConfig::validate`].
    pub fn new(
        config: GameConfig,
        switches: EngineSwitches,
        seed: Option<u64>,
    ) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config, switches, seed))
    }

    /// Create an engine from run options
    pub fn from_options(config: GameConfig, options: &RunOptions) -> ConfigResult<Self> {
        Self::new(config, EngineSwitches::from(options), options.seed)
    }

    /// Create a seeded engine with default switches
    pub fn with_seed(config: GameConfig, seed: u64) -> ConfigResult<Self> {
        Self::new(config, EngineSwitches::default(), Some(seed))
    }

    /// Build without validating. Callers have already run
    /// [`GameConfig::validate`] on `config`.
    pub(crate) fn from_validated(
        config: GameConfig,
        switches: EngineSwitches,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let grid = config.grid;

        Self {
            switches,
            rng,
            view: View::new(grid),
            scratch: View::new(grid),
            previous: View::new(grid),
            pass: WinPass::new(&config),
            stops: vec![0; grid.reels],
            line: Vec::with_capacity(grid.reels),
            free: FreeSpinState::new(),
            stats: Statistics::new(grid.reels, config.symbols.len()),
            rounds: 0,
            config,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Game definition
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Active switches
    pub fn switches(&self) -> EngineSwitches {
        self.switches
    }

    /// Window of the last evaluation
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Winning cells of the last evaluation
    pub fn winners(&self) -> &WinnersMask {
        &self.pass.winners
    }

    /// Per-line wins of the last evaluation
    pub fn line_wins(&self) -> &[u64] {
        &self.pass.line_wins
    }

    /// Line and scatter hits of the last evaluation
    pub fn attributions(&self) -> &[WinAttribution] {
        &self.pass.attributions
    }

    /// Stop positions of the last spin (moved by collapses)
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Accumulated statistics
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Take the statistics out of the engine
    pub fn into_stats(self) -> Statistics {
        self.stats
    }

    /// Base rounds played
    pub fn rounds_played(&self) -> u64 {
        self.rounds
    }

    /// Clear the statistics
    pub fn reset_stats(&mut self) {
        self.stats = Statistics::new(self.config.grid.reels, self.config.symbols.len());
        self.rounds = 0;
    }

    /// Reseed the generator
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ROUNDS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play one base round from random stops, including its collapses and
    /// free spins
    pub fn play_one_round(&mut self) -> RoundOutcome {
        self.play_round(None)
    }

    /// Play one base round from the given base stops
    pub fn play_round_at(&mut self, stops: &[usize]) -> RoundOutcome {
        self.play_round(Some(stops))
    }

    fn play_round(&mut self, forced: Option<&[usize]>) -> RoundOutcome {
        let bet = self.config.total_bet();
        let mut outcome = RoundOutcome {
            bet,
            ..Default::default()
        };
        self.stats.record_wager(bet);
        self.free.reset();
        self.rounds += 1;

        self.view.clear();
        match forced {
            Some(positions) => {
                spin_at(&mut self.view, &self.config.base_reels, positions, &mut self.stops)
            }
            None => spin_random(
                &mut self.view,
                &self.config.base_reels,
                &mut self.stops,
                &mut self.rng,
            ),
        }

        outcome.expanded = self.expand();
        if outcome.expanded && self.config.rules.reveal_bonus_spin && self.switches.free_spins {
            self.free.award(1);
            outcome.free_spins_awarded += 1;
        }

        let mut win = self.evaluate();
        self.stats.record_symbols(Phase::Base, &self.pass.attributions);
        outcome.base_win = win;

        if self.config.rules.collapse {
            let mut multiplier = 2;
            while win > 0 {
                if outcome.collapses >= self.config.rules.max_collapses {
                    log::warn!(
                        "Collapse chain reached the cap of {} steps at stops {:?}",
                        self.config.rules.max_collapses,
                        self.stops
                    );
                    break;
                }
                collapse(
                    &mut self.view,
                    &self.pass.winners,
                    &self.config.base_reels,
                    &mut self.stops,
                );
                win = self.evaluate();
                if win == 0 {
                    break;
                }
                self.pass.scale(multiplier);
                self.stats.record_symbols(Phase::Base, &self.pass.attributions);
                outcome.base_win += self.pass.total();
                outcome.collapses += 1;
                multiplier += 1;
            }
        }
        self.stats.record_outcome(Phase::Base, outcome.base_win);

        if self.switches.free_spins {
            let trigger = self.free.check(
                &self.config.rules.free_spins,
                &self.config.symbols,
                &self.view,
                false,
            );
            self.stats.record_trigger(trigger);
            outcome.free_spins_awarded += trigger.spins();
        }

        let cap = self.config.rules.max_free_spins;
        while self.free.next_spin() {
            outcome.free_win += self.play_free_spin();
            if self.free.played() >= cap && self.free.is_active() {
                log::warn!(
                    "Free spins reached the cap of {} with {} left at stops {:?}",
                    cap,
                    self.free.remaining(),
                    self.stops
                );
                break;
            }
        }
        outcome.free_spins = self.free.played();
        self.stats.record_run(outcome.free_spins, outcome.collapses);

        outcome
    }

    fn play_free_spin(&mut self) -> u64 {
        let sticky = self.config.rules.sticky_extending_wilds;
        if sticky {
            self.previous.copy_from(&self.view);
        }

        self.view.clear();
        spin_random(
            &mut self.view,
            &self.config.free_reels,
            &mut self.stops,
            &mut self.rng,
        );
        if sticky {
            restore_sticky_wilds(&self.config, &self.previous, &mut self.view);
        }

        if self.expand() && self.config.rules.reveal_bonus_spin {
            self.free.award(1);
        }

        self.evaluate();
        self.pass.scale(self.config.multipliers.free_spins);
        let win = self.pass.total();
        self.stats
            .record_round(Phase::Free, win, &self.pass.attributions);

        let trigger = self.free.check(
            &self.config.rules.free_spins,
            &self.config.symbols,
            &self.view,
            true,
        );
        self.stats.record_trigger(trigger);

        win
    }

    fn expand(&mut self) -> bool {
        let evaluator = Evaluator::new(&self.config, self.switches.wilds);
        WildExpander::new(&self.config, evaluator).expand(
            self.config.rules.expansion,
            &mut self.view,
            &mut self.scratch,
            &mut self.line,
        )
    }

    fn evaluate(&mut self) -> u64 {
        Evaluator::new(&self.config, self.switches.wilds).evaluate(&self.view, &mut self.pass)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DRIVERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play `rounds` random base rounds
    pub fn simulate(&mut self, rounds: u64) {
        log::info!("Simulating {} rounds of '{}'", rounds, self.config.name);
        for done in 0..rounds {
            self.report_progress(done as u128, rounds as u128);
            self.play_one_round();
        }
        log::info!(
            "Finished {} rounds, RTP {:.4}",
            rounds,
            self.stats.won() as f64 / self.stats.wagered.max(1) as f64
        );
    }

    /// Enumerate every base stop combination once
    pub fn brute_force(&mut self) {
        let total = self.config.base_combinations();
        self.brute_force_range(0..total);
    }

    /// Enumerate base stop combinations with index in `range`.
    ///
    /// Indices follow [`Odometer`] order, so disjoint ranges never share a
    /// combination.
    pub fn brute_force_range(&mut self, range: Range<u128>) {
        let mut odometer = Odometer::for_strips(&self.config.base_reels);
        let end = range.end.min(odometer.total());
        odometer.seek(range.start);
        log::info!(
            "Enumerating combinations {}..{} of {} for '{}'",
            range.start,
            end,
            odometer.total(),
            self.config.name
        );

        let length = end.saturating_sub(range.start);
        while odometer.index() < end {
            self.report_progress(odometer.index() - range.start, length);
            self.play_round_at(odometer.stops());
            odometer.advance();
        }
    }

    fn report_progress(&self, done: u128, total: u128) {
        let interval = self.switches.progress_interval as u128;
        if interval == 0 || done == 0 || done % interval != 0 {
            return;
        }
        let wagered = self.stats.wagered.max(1) as f64;
        log::info!(
            "{} of {}\tRTP {:6.2}%\tbase {:6.2}%\tfree {:6.2}%",
            done,
            total,
            100.0 * self.stats.won() as f64 / wagered,
            100.0 * self.stats.base.money as f64 / wagered,
            100.0 * self.stats.free.money as f64 / wagered
        );
    }
}
