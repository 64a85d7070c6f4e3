//! Error types for progression domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing progression values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProgressionDomainError {
    /// XP awards must be strictly positive.
    #[error("invalid XP amount {0}, expected a positive integer")]
    InvalidXpAmount(u64),

    /// A persisted progression triple does not satisfy the level curve.
    #[error(
        "inconsistent progression state: level {level}, current XP {current_xp}, total XP {total_xp}"
    )]
    InconsistentState {
        /// Persisted level.
        level: u32,
        /// Persisted in-level XP.
        current_xp: i64,
        /// Persisted cumulative XP.
        total_xp: u64,
    },
}

/// Error returned while parsing a priority or difficulty from storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseRatingError {
    /// Which rating was being parsed.
    pub kind: &'static str,
    /// The rejected value.
    pub value: String,
}
