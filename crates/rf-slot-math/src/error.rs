//! Error types for game loading and reel modeling

use thiserror::Error;

/// Configuration error, raised while loading or validating a game.
///
/// All of these are fatal: an engine is only ever built from a config that
/// passed validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("Unsupported game file extension: {0}")]
    UnsupportedFormat(String),

    #[error("Grid must have at least one reel and one row (got {reels}x{rows})")]
    EmptyGrid { reels: usize, rows: usize },

    #[error("Duplicate symbol name: {0}")]
    DuplicateSymbol(String),

    #[error("Unknown symbol '{name}' referenced in {context}")]
    UnknownSymbol { name: String, context: String },

    #[error("Paytable row for '{symbol}' has {found} entries, expected {expected}")]
    PaytableDimension {
        symbol: String,
        expected: usize,
        found: usize,
    },

    #[error("Payline {line} has {found} positions, expected {expected}")]
    PaylineLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Payline {line} uses row {row} on reel {reel}, window has {rows} rows")]
    PaylineRow {
        line: usize,
        reel: usize,
        row: usize,
        rows: usize,
    },

    #[error("Game defines no paylines")]
    NoPaylines,

    #[error("{set} reel set has {found} strips, expected {expected}")]
    StripCount {
        set: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{set} reel strip {reel} is empty")]
    EmptyStrip { set: &'static str, reel: usize },

    #[error("Line bet must be greater than zero")]
    ZeroLineBet,

    #[error("Rule '{rule}' needs a wild symbol, but the game has none")]
    MissingWild { rule: &'static str },

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Reel modeling error
#[derive(Error, Debug)]
pub enum ModelingError {
    #[error("Paytable has no paying symbols to build strips from")]
    NothingToPlace,

    #[error("Target strip length must be greater than zero")]
    ZeroLength,

    #[error("Could not reach {repeats} neighbouring repeats on reel {reel} after {attempts} attempts")]
    RepeatLimit {
        reel: usize,
        repeats: usize,
        attempts: usize,
    },
}

/// Result type alias for loading
pub type ConfigResult<T> = Result<T, ConfigError>;
