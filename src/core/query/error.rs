//! Query-specific error types.

use thiserror::Error;

/// Errors raised while executing a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The provider cannot evaluate a raw SQL fragment.
    #[error("Unsupported raw predicate: {0}")]
    UnsupportedRaw(String),

    /// The backing storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl QueryError {
    /// Create a new "unsupported raw" error.
    pub fn unsupported_raw(sql: impl Into<String>) -> Self {
        Self::UnsupportedRaw(sql.into())
    }

    /// Create a new "storage" error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
