//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::core::query::QueryError;
use crate::domains::panels::PanelError;
use crate::domains::resources::ResourceError;

/// An error rendered as a JSON body with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ResourceError> for ApiError {
    fn from(error: ResourceError) -> Self {
        let status = match &error {
            ResourceError::NotFound(_) => StatusCode::NOT_FOUND,
            ResourceError::AccessDenied(_) => StatusCode::FORBIDDEN,
            ResourceError::Routing(_) | ResourceError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("Resource error: {}", error);
        }
        Self::new(status, error.to_string())
    }
}

impl From<QueryError> for ApiError {
    fn from(error: QueryError) -> Self {
        ResourceError::from(error).into()
    }
}

impl From<PanelError> for ApiError {
    fn from(error: PanelError) -> Self {
        match error {
            PanelError::Resource(error) => error.into(),
            PanelError::UnknownPanel(_) | PanelError::TenantNotFound { .. } => {
                Self::not_found(error.to_string())
            }
            other => {
                warn!("Panel error: {}", other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}
