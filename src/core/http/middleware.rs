//! Middleware identifiers resolved to tower layers.

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{Next, from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, warn};

use super::server::AppState;
use crate::core::context::User;
use crate::core::middleware::{
    AUTHENTICATE, CORS, DISPATCH_SERVING_PANEL, IDENTIFY_USER, TRACE_REQUESTS, USER_HEADER,
};
use crate::domains::panels::PanelError;

/// The user identified for the current request.
#[derive(Debug, Clone)]
pub struct Identity(pub User);

/// Panel serving the current request.
#[derive(Debug, Clone)]
pub struct ServingPanel(pub String);

/// Response header naming the panel that served the request.
pub const PANEL_HEADER: &str = "x-panel";

/// Wraps a route's handler in one middleware.
pub type ApplyMiddleware =
    Arc<dyn Fn(MethodRouter<AppState>, &AppState, &str) -> MethodRouter<AppState> + Send + Sync>;

/// Maps middleware identifiers to the layers implementing them.
#[derive(Clone)]
pub struct MiddlewareRegistry {
    entries: HashMap<String, ApplyMiddleware>,
}

impl MiddlewareRegistry {
    /// A registry without any middleware.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `id`. The callback receives the handler, the shared state
    /// and the id of the panel owning the route.
    pub fn register<F>(mut self, id: impl Into<String>, apply: F) -> Self
    where
        F: Fn(MethodRouter<AppState>, &AppState, &str) -> MethodRouter<AppState> + Send + Sync + 'static,
    {
        self.entries.insert(id.into(), Arc::new(apply));
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Wrap `handler` in `middleware`, first entry outermost.
    pub fn apply(
        &self,
        mut handler: MethodRouter<AppState>,
        middleware: &[String],
        state: &AppState,
        panel_id: &str,
    ) -> Result<MethodRouter<AppState>, PanelError> {
        for id in middleware.iter().rev() {
            let apply = self
                .entries
                .get(id)
                .ok_or_else(|| PanelError::UnknownMiddleware(id.clone()))?;
            handler = apply(handler, state, panel_id);
        }
        Ok(handler)
    }
}

impl Default for MiddlewareRegistry {
    fn default() -> Self {
        Self::empty()
            .register(TRACE_REQUESTS, |handler, _, _| handler.layer(TraceLayer::new_for_http()))
            .register(CORS, |handler, _, _| handler.layer(CorsLayer::permissive()))
            .register(IDENTIFY_USER, |handler, state, _| {
                handler.layer(from_fn_with_state(state.clone(), identify_user))
            })
            .register(DISPATCH_SERVING_PANEL, |handler, _, panel_id| {
                handler.layer(from_fn_with_state(
                    ServingPanel(panel_id.to_string()),
                    dispatch_serving_panel,
                ))
            })
            .register(AUTHENTICATE, |handler, _, _| handler.layer(from_fn(authenticate)))
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.entries.keys().collect();
        ids.sort();
        f.debug_struct("MiddlewareRegistry").field("ids", &ids).finish()
    }
}

/// Attach the [`Identity`] named by the user header, if the user exists.
async fn identify_user(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if let Some(id) = id {
        match state.runtime.user(&id) {
            Some(user) => {
                request.extensions_mut().insert(Identity(user.clone()));
            }
            None => warn!("Unknown user '{}' in {} header", id, USER_HEADER),
        }
    }

    next.run(request).await
}

/// Reject guests.
async fn authenticate(request: Request, next: Next) -> Response {
    if request.extensions().get::<Identity>().is_none() {
        warn!("Unauthenticated request to {}", request.uri().path());
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthenticated." })),
        )
            .into_response();
    }
    next.run(request).await
}

/// Record the serving panel on the request and the response.
async fn dispatch_serving_panel(
    State(panel): State<ServingPanel>,
    mut request: Request,
    next: Next,
) -> Response {
    debug!("Serving panel '{}'", panel.0);
    request.extensions_mut().insert(panel.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&panel.0) {
        response.headers_mut().insert(PANEL_HEADER, value);
    }
    response
}
