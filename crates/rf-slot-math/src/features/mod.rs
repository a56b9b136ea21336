//! Feature System: Window-changing and round-extending mechanics
//!
//! ## Architecture
//!
//! ```text
//! spin ──► expansion ──► evaluate ──► cascade (base, while paying)
//!                                         │
//!                                         └──► free_spins trigger / retrigger
//! ```
//!
//! The active behaviour of each feature is picked once from [`crate::Rules`];
//! the engine dispatches on it with a single `match` per round.

mod cascade;
mod expansion;
mod free_spins;

pub use cascade::*;
pub use expansion::*;
pub use free_spins::*;
