//! Error types for Tickline
//!
//! Ordinary misuse (reversed bounds, NaN, navigating an empty timeline) is
//! normalized in place. These errors cover the calls that have no sensible
//! normalization.

use thiserror::Error;

/// Core Tickline errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TicklineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown constraint: {0}")]
    UnknownConstraint(u64),

    #[error("Unknown selection listener: {0}")]
    UnknownListener(u64),

    #[error("Updatable is not registered with the scheduler")]
    NotRegistered,
}

/// Result type for Tickline operations
pub type TicklineResult<T> = Result<T, TicklineError>;
