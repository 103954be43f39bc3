//! HTTP server mounting every panel route.
//!
//! Each route of the booted [`RouteTable`](crate::core::routing::RouteTable)
//! becomes an axum route wrapped in the middleware it names. A single
//! handler dispatches on the route's [`RouteAction`].

use axum::{
    Extension, Json, Router,
    extract::{Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, instrument, warn};

use super::error::ApiError;
use super::middleware::{Identity, MiddlewareRegistry, ServingPanel};
use crate::core::config::Config;
use crate::core::context::RequestContext;
use crate::core::routing::{Route, RouteAction};
use crate::domains::panels::{PanelError, PanelRuntime};
use crate::domains::resources::{Action, Resource, ResourceError, ResourceServices, pages};

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Booted panels.
    pub runtime: Arc<PanelRuntime>,
    /// Server configuration.
    pub config: Arc<Config>,
}

/// A route together with the panel that registered it.
#[derive(Debug, Clone)]
struct MountedRoute {
    panel: String,
    route: Route,
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    search: String,
}

/// HTTP front of a [`PanelRuntime`].
pub struct HttpServer {
    state: AppState,
    middleware: MiddlewareRegistry,
}

impl HttpServer {
    pub fn new(config: Config, runtime: PanelRuntime) -> Self {
        Self {
            state: AppState {
                runtime: Arc::new(runtime),
                config: Arc::new(config),
            },
            middleware: MiddlewareRegistry::default(),
        }
    }

    /// Replace the middleware available to routes.
    pub fn with_middleware(mut self, middleware: MiddlewareRegistry) -> Self {
        self.middleware = middleware;
        self
    }

    /// Build the axum router.
    ///
    /// Fails when a route names middleware the registry does not know or
    /// two routes share a path.
    pub fn router(&self) -> Result<Router, PanelError> {
        let state = &self.state;
        let routes = state.runtime.routes().routes();
        let mut paths = HashSet::new();
        let mut app = Router::new().route("/health", get(health_check));

        for panel in state.runtime.registry().panels() {
            let prefix = panel.route_name("");
            for route in routes.iter().filter(|route| route.name.starts_with(&prefix)) {
                if !paths.insert(route.path.clone()) {
                    return Err(PanelError::DuplicatePath(route.path.clone()));
                }

                let mounted = MountedRoute {
                    panel: panel.get_id().to_string(),
                    route: route.clone(),
                };
                let handler = get(handle_route).layer(Extension(Arc::new(mounted)));
                let handler = self
                    .middleware
                    .apply(handler, &route.middleware, state, panel.get_id())?;

                debug!("Mounted {} at {}", route.name, route.path);
                app = app.route(&route.path, handler);
            }
        }

        let mut app = app.with_state(state.clone());
        if state.config.http.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        Ok(app)
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> crate::core::Result<()> {
        let addr = self.state.config.http.address();
        let app = self.router()?;

        let listener = tokio::net::TcpListener::bind(&addr).await?;

        let cors_status = if self.state.config.http.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        for panel in self.state.runtime.registry().panels() {
            info!("  → Panel {}: GET /{}", panel.get_id(), panel.get_path());
        }
        info!("  → Health: GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let panels: Vec<&str> = state.runtime.registry().panels().map(|p| p.get_id()).collect();
    Json(json!({
        "status": "healthy",
        "name": state.config.server.name,
        "version": state.config.server.version,
        "panels": panels,
        "routes": state.runtime.routes().routes().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Dispatch a panel route.
#[instrument(skip_all, fields(route))]
async fn handle_route(
    State(state): State<AppState>,
    Extension(mounted): Extension<Arc<MountedRoute>>,
    request: Request,
) -> Result<Json<Value>, ApiError> {
    let route = &mounted.route;
    tracing::Span::current().record("route", route.name.as_str());

    let parameters = route
        .extract_parameters(request.uri().path())
        .unwrap_or_default();
    let panel_id = request
        .extensions()
        .get::<ServingPanel>()
        .map_or(mounted.panel.as_str(), |panel| panel.0.as_str());
    let user_id = request
        .extensions()
        .get::<Identity>()
        .map(|identity| identity.0.id.as_str());

    let runtime = &state.runtime;
    let ctx = runtime.context(
        panel_id,
        user_id,
        parameters.get("tenant").map(String::as_str),
    )?;
    let panel = runtime.panel(panel_id)?;
    let services = runtime.services();

    let body = match &route.action {
        RouteAction::Login => json!({
            "panel": panel_id,
            "page": "login",
            "authenticated": ctx.authenticated_user().is_some(),
        }),
        RouteAction::Page { page } => {
            let navigation = panel.navigation(&ctx, services)?;
            json!({
                "panel": panel_id,
                "page": page,
                "navigation": navigation,
            })
        }
        RouteAction::GlobalSearch => {
            let params: SearchParams =
                serde_urlencoded::from_str(request.uri().query().unwrap_or_default())
                    .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;
            let groups = panel.global_search(&ctx, services, &params.search)?;
            json!({
                "panel": panel_id,
                "search": params.search,
                "groups": groups,
            })
        }
        RouteAction::ResourcePage { resource, page } => {
            let resource = runtime
                .resource(panel_id, resource)
                .ok_or_else(|| ApiError::not_found(format!("Resource [{resource}] not found")))?;
            let mut body = resource_page(&ctx, services, resource, page, &parameters)?;
            body["panel"] = json!(panel_id);
            body
        }
    };

    Ok(Json(body))
}

/// Authorize and render one page of a resource.
fn resource_page(
    ctx: &RequestContext,
    services: &ResourceServices,
    resource: Resource<'_>,
    page: &str,
    parameters: &BTreeMap<String, String>,
) -> Result<Value, ApiError> {
    let record = match parameters.get("record") {
        Some(key) => Some(
            resource
                .resolve_record_route_binding(ctx, key)?
                .ok_or_else(|| ResourceError::not_found(key.clone()))?,
        ),
        None => None,
    };

    let action = match (page, &record) {
        (pages::INDEX, _) => Action::ViewAny,
        (pages::CREATE, _) => Action::Create,
        (pages::EDIT, Some(_)) => Action::Update,
        (_, Some(_)) => Action::View,
        (_, None) => Action::ViewAny,
    };
    resource.authorize(ctx, action, record.as_ref())?;

    let mut body = json!({
        "resource": resource.slug(),
        "page": page,
        "breadcrumb": resource.breadcrumb(ctx),
        "title": resource.record_title(record.as_ref()),
    });

    if page == pages::INDEX {
        let records = services.queries.get(&resource.eloquent_query(ctx))?;
        body["records"] = json!(records);
    }
    if let Some(record) = record {
        body["record"] = json!(record);
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::middleware::USER_HEADER;
    use crate::domains::panels::{PanelRegistry, demo_store, demo_users, get_all_panel_providers};
    use crate::domains::resources::{NamingStrategy, get_all_policies};
    use axum::body::Body;
    use axum::http::HeaderMap;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = Config::default();
        config.http.base_url = Some("http://localhost".to_string());

        let registry = PanelRegistry::from_providers(&get_all_panel_providers()).unwrap();
        let gate = get_all_policies(&NamingStrategy::new());
        let runtime = PanelRuntime::boot(
            registry,
            Arc::new(gate),
            Arc::new(demo_store("sqlite")),
            demo_users(),
            &config,
        )
        .unwrap();

        HttpServer::new(config, runtime)
    }

    async fn send(uri: &str, user: Option<&str>) -> (StatusCode, HeaderMap, Value) {
        let app = server().router().unwrap();
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user);
        }

        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    fn group_labels(body: &Value) -> Vec<&str> {
        body["groups"]
            .as_array()
            .unwrap()
            .iter()
            .map(|group| group["label"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = send("/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["panels"], json!(["admin", "custom"]));
    }

    #[tokio::test]
    async fn test_login_is_public() {
        let (status, headers, body) = send("/admin/login", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], false);
        assert_eq!(headers.get("x-panel").unwrap(), "admin");

        let (status, headers, _) = send("/custom/login", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get("x-panel").unwrap(), "custom");
    }

    #[tokio::test]
    async fn test_guests_are_rejected() {
        let (status, _, body) = send("/admin/blog/posts", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthenticated.");

        let (status, _, _) = send("/admin/blog/posts", Some("404")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_index_lists_records() {
        let (status, _, body) = send("/admin/blog/posts", Some("2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["panel"], "admin");
        assert_eq!(body["resource"], "blog/posts");
        assert_eq!(body["breadcrumb"], "Posts");
        assert_eq!(body["records"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_policy_denies_editor() {
        let (status, _, _) = send("/admin/users", Some("2")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, body) = send("/admin/users", Some("1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["records"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_edit_resolves_record() {
        let (status, _, body) = send("/admin/blog/posts/1/edit", Some("1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Announcing 1.0");
        assert_eq!(body["record"]["attributes"]["status"], "published");

        let (status, _, _) = send("/admin/blog/posts/1/edit", Some("2")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, _) = send("/admin/blog/posts/2/edit", Some("2")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = send("/admin/blog/posts/99/edit", Some("1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dashboard_navigation() {
        let (status, _, body) = send("/admin/dashboard", Some("2")).await;
        assert_eq!(status, StatusCode::OK);
        let groups = body["navigation"].as_array().unwrap();
        assert_eq!(groups[0]["label"], "Blog");
        assert_eq!(groups[0]["items"][0]["label"], "Posts");
    }

    #[tokio::test]
    async fn test_global_search() {
        let (status, _, body) = send("/admin/global-search?search=ada", Some("1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["search"], "ada");
        assert_eq!(group_labels(&body), ["posts", "users"]);

        let posts = body["groups"][0]["results"].as_array().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0]["url"], "http://localhost/admin/blog/posts/1/edit");

        let (_, _, body) = send("/admin/global-search?search=ada", Some("2")).await;
        assert_eq!(group_labels(&body), ["posts"]);
        assert_eq!(
            body["groups"][0]["results"][0]["url"],
            "http://localhost/admin/blog/posts/1"
        );

        let (_, _, body) = send("/admin/global-search?search=versions", Some("2")).await;
        assert_eq!(group_labels(&body), ["categories"]);
        let category = &body["groups"][0]["results"][0];
        assert_eq!(category["title"], "Releases");
        assert_eq!(category["url"], "http://localhost/admin/blog/categories/1/edit");

        let (_, _, body) = send("/admin/global-search?search=%20%20", Some("1")).await;
        assert!(group_labels(&body).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_middleware() {
        let result = server()
            .with_middleware(MiddlewareRegistry::empty())
            .router();
        assert!(matches!(result, Err(PanelError::UnknownMiddleware(_))));
    }
}
