//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror. Missing or expired keys are
//! not errors; lookups report them through `Option` and `bool` results.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A TTL that cannot be represented, or a record that cannot be decomposed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CacheError {
    /// Builds an `InvalidArgument` error from any displayable message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CacheError::InvalidArgument(msg.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
