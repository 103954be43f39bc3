//! Panel-specific error types.

use thiserror::Error;

use crate::core::query::QueryError;
use crate::core::routing::RoutingError;
use crate::domains::resources::ResourceError;

/// Errors raised while booting panels or serving their requests.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Two resources of one panel resolve to the same slug.
    #[error("Panel [{panel}] registers more than one resource with slug [{slug}]")]
    DuplicateSlug {
        /// Panel id.
        panel: String,
        /// Conflicting slug.
        slug: String,
    },

    /// A resource slug cannot be used in URLs.
    #[error("Panel [{panel}] registers a resource with invalid slug [{slug}]")]
    InvalidSlug {
        /// Panel id.
        panel: String,
        /// Rejected slug.
        slug: String,
    },

    /// Two providers configure a panel with the same id.
    #[error("Panel [{0}] is already registered")]
    DuplicatePanel(String),

    /// No panel is registered under the id.
    #[error("Panel [{0}] not found")]
    UnknownPanel(String),

    /// Two routes are mounted at the same path.
    #[error("More than one route is mounted at [{0}]")]
    DuplicatePath(String),

    /// A route references middleware the HTTP layer does not know.
    #[error("Unknown middleware [{0}]")]
    UnknownMiddleware(String),

    /// The tenant in the URL does not exist.
    #[error("Tenant [{key}] not found for panel [{panel}]")]
    TenantNotFound {
        /// Panel id.
        panel: String,
        /// Tenant key from the URL.
        key: String,
    },

    /// A resource operation failed.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Route registration or URL generation failed.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// The query provider failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl PanelError {
    /// Create a new "duplicate slug" error.
    pub fn duplicate_slug(panel: impl Into<String>, slug: impl Into<String>) -> Self {
        Self::DuplicateSlug {
            panel: panel.into(),
            slug: slug.into(),
        }
    }

    /// Create a new "tenant not found" error.
    pub fn tenant_not_found(panel: impl Into<String>, key: impl Into<String>) -> Self {
        Self::TenantNotFound {
            panel: panel.into(),
            key: key.into(),
        }
    }
}
