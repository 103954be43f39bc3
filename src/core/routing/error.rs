//! Routing error types.

use thiserror::Error;

/// Errors raised while registering routes or generating URLs.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// No route is registered under the name.
    #[error("Route [{0}] not defined")]
    RouteNotFound(String),

    /// A route with the same name is already registered.
    #[error("Route [{0}] is already defined")]
    DuplicateRouteName(String),

    /// A path parameter needed to build the URL was not supplied.
    #[error("Missing required parameter [{parameter}] for route [{route}]")]
    MissingParameter {
        /// Route name.
        route: String,
        /// Parameter name.
        parameter: String,
    },

    /// A parameter value cannot be placed in a URL.
    #[error("Invalid value for parameter [{parameter}]: {reason}")]
    InvalidParameter {
        /// Parameter name.
        parameter: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The query string could not be encoded.
    #[error("Query string error: {0}")]
    QueryString(#[from] serde_urlencoded::ser::Error),
}

impl RoutingError {
    /// Create a new "route not found" error.
    pub fn route_not_found(name: impl Into<String>) -> Self {
        Self::RouteNotFound(name.into())
    }

    /// Create a new "missing parameter" error.
    pub fn missing_parameter(route: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            route: route.into(),
            parameter: parameter.into(),
        }
    }
}
