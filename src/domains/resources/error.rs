//! Resource-specific error types.

use thiserror::Error;

use crate::core::query::QueryError;
use crate::core::routing::RoutingError;

/// Errors that can occur during resource operations.
///
/// Router and query errors propagate unchanged. Authorization denial is
/// reported as a boolean by the `can_*` checks; [`ResourceError::AccessDenied`]
/// only comes from the explicit `authorize` helper.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// URL generation or route registration failed.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// The query provider failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// No record is bound to the route key.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The authenticated user may not perform the action.
    #[error("Access denied: {0}")]
    AccessDenied(String),
}

impl ResourceError {
    /// Create a new "not found" error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Create a new "access denied" error.
    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }
}
