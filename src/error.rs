//! Crate-wide error type.
//!
//! One variant per failure kind that can actually surface to a caller.
//! Table conflicts and simulator rejections are NOT errors (see
//! [`crate::table`] and [`crate::simulator`]); they are ordinary values.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrammarToolError {
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    #[error("could not augment grammar: {0}")]
    AugmentationFailure(String),

    #[error("no entry for state {state} and symbol {symbol}")]
    NoSuchCell { state: String, symbol: String },

    #[error("symbol {symbol} is a {actual}, expected a {expected} for this query")]
    WrongCategory {
        symbol: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid simulator configuration: {0}")]
    SimulatorConfigInvalid(String),

    #[error("I/O error: {0}")]
    IoFailure(#[from] std::io::Error),
}

/// Type alias for `Result`s in this crate.
pub type Result<T> = std::result::Result<T, GrammarToolError>;
