//! Error types for orgchain-resolve.
//!
//! Resolution itself never fails. These cover loading records, reading
//! configuration and delivering results.

use std::time::Duration;
use thiserror::Error;

/// Result type for orgchain-resolve operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised around a resolution run.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record without an identity.
    #[error("record {position} has no userId")]
    MissingUserId { position: usize },

    /// Two records claim the same identity.
    #[error("duplicate userId: {0}")]
    DuplicateUserId(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {key}={value}")]
    InvalidConfig { key: &'static str, value: String },

    /// The caller's wall-clock budget ran out before the run finished.
    #[error("resolution exceeded budget of {0:?}")]
    BudgetExceeded(Duration),
}
