//! # rf-slot-math: Slot game math simulator
//!
//! Measures the long-run statistics of a slot game definition: return to
//! player, hit frequencies, win distribution and per-symbol contributions.
//! Games are played either by Monte Carlo sampling or by enumerating every
//! base-game stop combination.
//!
//! ## Features
//!
//! - **Game documents**: YAML/JSON definitions validated into a [`GameConfig`]
//! - **Line and scatter evaluation**: wild substitution, both-ways lines,
//!   per-line amounts and per-symbol attribution
//! - **Features**: four wild-expansion variants, collapse with growing
//!   multipliers, free spins with retriggers and sticky wilds
//! - **Statistics**: mergeable accumulators and a serializable report
//! - **Parallel runs**: seeded workers over `rayon`
//! - **Reel modeling**: initial strips, stacked shuffles, strip census
//!
//! ## Architecture
//!
//! ```text
//! GameParser ──► GameConfig ──► SlotEngine ────────────────► Statistics
//!                  │              │                              │
//!                  │              ├── spin (strips → View)       ├── merge
//!                  │              ├── features::WildExpander     └── report
//!                  │              ├── Evaluator (View → WinPass)
//!                  │              ├── features::collapse
//!                  │              └── features::FreeSpinState
//!                  │
//!                  └──► parallel::run (N engines) ──► merged Statistics
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod modeling;
pub mod parallel;
pub mod parser;
pub mod paytable;
pub mod spin;
pub mod stats;
pub mod symbols;
pub mod view;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use evaluate::*;
pub use features::*;
pub use modeling::*;
pub use parallel::*;
pub use parser::*;
pub use paytable::*;
pub use spin::*;
pub use stats::*;
pub use symbols::*;
pub use view::*;
