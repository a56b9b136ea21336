//! Free spins bookkeeping

use serde::{Deserialize, Serialize};

use crate::config::FreeSpinTrigger;
use crate::symbols::SymbolSet;
use crate::view::View;

/// What a trigger check did to the free spins counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerOutcome {
    /// Nothing awarded
    None,
    /// Spins awarded from the base game
    Start(u32),
    /// Spins added while already in free spins
    Restart(u32),
}

impl TriggerOutcome {
    /// Spins awarded
    pub fn spins(&self) -> u32 {
        match *self {
            Self::None => 0,
            Self::Start(n) | Self::Restart(n) => n,
        }
    }
}

/// Free spins counter of one base round
#[derive(Debug, Clone, Default)]
pub struct FreeSpinState {
    remaining: u32,
    played: u32,
}

impl FreeSpinState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset at the start of a base round
    pub fn reset(&mut self) {
        self.remaining = 0;
        self.played = 0;
    }

    /// Add spins to the counter
    pub fn award(&mut self, spins: u32) {
        self.remaining = self.remaining.saturating_add(spins);
    }

    /// Check trigger symbols in `view` and award spins.
    ///
    /// `in_free` tells a retrigger apart from a start.
    pub fn check(
        &mut self,
        trigger: &FreeSpinTrigger,
        symbols: &SymbolSet,
        view: &View,
        in_free: bool,
    ) -> TriggerOutcome {
        if !trigger.is_enabled() {
            return TriggerOutcome::None;
        }
        let spins = trigger.award(count_triggers(symbols, view));
        if spins == 0 {
            return TriggerOutcome::None;
        }
        self.award(spins);
        if in_free {
            TriggerOutcome::Restart(spins)
        } else {
            TriggerOutcome::Start(spins)
        }
    }

    /// Consume one spin. Returns false when none are left.
    pub fn next_spin(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.played += 1;
        true
    }

    /// Spins still to play
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Spins played since the last reset
    pub fn played(&self) -> u32 {
        self.played
    }

    /// Check if spins are pending
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }
}

/// Trigger-capable cells in the window, all kinds counted together
pub fn count_triggers(symbols: &SymbolSet, view: &View) -> usize {
    view.count_where(|s| symbols.is_trigger(s))
}
