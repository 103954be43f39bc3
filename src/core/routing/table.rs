//! In-process route table.

use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use super::{
    RegisterRoutes, Route, RouteDefinition, RouteGroup, RouteParameters, Router, RoutingError,
    encode_segment,
};

/// Route registry with nested groups and URL generation.
///
/// Absolute URLs are prefixed with `base_url`. Parameters that do not appear
/// in the route path are appended as a query string.
#[derive(Debug)]
pub struct RouteTable {
    base_url: String,
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    routes: IndexMap<String, Route>,
    groups: Vec<RouteGroup>,
}

impl RouteTable {
    /// Create an empty table generating absolute URLs under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Base URL for absolute URLs.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All routes in registration order.
    pub fn routes(&self) -> Vec<Route> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.routes.values().cloned().collect()
    }

    /// Look up a route by name.
    pub fn route(&self, name: &str) -> Option<Route> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.routes.get(name).cloned()
    }

    /// Whether a route called `name` exists.
    pub fn has(&self, name: &str) -> bool {
        self.route(name).is_some()
    }
}

impl Router for RouteTable {
    fn register_route_group(
        &self,
        group: RouteGroup,
        register: &mut RegisterRoutes<'_>,
    ) -> Result<(), RoutingError> {
        {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            inner.groups.push(group);
        }

        let result = register(self);

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.groups.pop();
        result
    }

    fn add_route(&self, definition: RouteDefinition) -> Result<(), RoutingError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let mut name = String::new();
        let mut segments: Vec<&str> = Vec::new();
        let mut middleware = Vec::new();
        for group in &inner.groups {
            name.push_str(&group.name_prefix);
            segments.extend(path_segments(&group.path_prefix));
            for id in &group.middleware {
                if !middleware.contains(id) {
                    middleware.push(id.clone());
                }
            }
        }
        name.push_str(&definition.name);
        segments.extend(path_segments(&definition.path));

        let route = Route {
            path: format!("/{}", segments.join("/")),
            name: name.clone(),
            middleware,
            action: definition.action,
        };

        if inner.routes.contains_key(&name) {
            return Err(RoutingError::DuplicateRouteName(name));
        }

        debug!("Registered route {} -> {}", route.name, route.path);
        inner.routes.insert(name, route);
        Ok(())
    }

    fn resolve_url(
        &self,
        name: &str,
        parameters: &RouteParameters,
        absolute: bool,
    ) -> Result<String, RoutingError> {
        let route = self
            .route(name)
            .ok_or_else(|| RoutingError::route_not_found(name))?;

        let placeholders = route.parameter_names();
        let mut segments = Vec::new();
        for segment in route.path.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(parameter) => {
                    let value = parameters
                        .value_string(parameter)
                        .ok_or_else(|| RoutingError::missing_parameter(name, parameter))?;
                    if matches!(value.as_str(), "" | "." | "..") {
                        return Err(RoutingError::InvalidParameter {
                            parameter: parameter.to_string(),
                            reason: format!("'{value}' is not a usable path segment"),
                        });
                    }
                    segments.push(encode_segment(&value));
                }
                None => segments.push(segment.to_string()),
            }
        }

        let mut url = format!("/{}", segments.join("/"));

        let extra: Vec<(String, String)> = parameters
            .iter()
            .filter(|(key, _)| !placeholders.contains(&key.as_str()))
            .filter_map(|(key, _)| Some((key.clone(), parameters.value_string(key)?)))
            .collect();
        if !extra.is_empty() {
            url.push('?');
            url.push_str(&serde_urlencoded::to_string(&extra)?);
        }

        if absolute {
            url.insert_str(0, &self.base_url);
        }

        Ok(url)
    }
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::routing::RouteAction;
    use serde_json::json;

    fn page(resource: &str, page: &str) -> RouteAction {
        RouteAction::ResourcePage {
            resource: resource.to_string(),
            page: page.to_string(),
        }
    }

    fn table() -> RouteTable {
        let table = RouteTable::new("http://localhost:8080/");
        table
            .register_route_group(
                RouteGroup::new("filament.admin.", "admin").middleware(vec!["trace_requests".into()]),
                &mut |router| {
                    router.register_route_group(
                        RouteGroup::new("resources.posts.", "posts")
                            .middleware(vec!["authenticate".into()]),
                        &mut |router| {
                            router.add_route(RouteDefinition::new("index", "/", page("posts", "index")))?;
                            router.add_route(RouteDefinition::new(
                                "edit",
                                "/{record}/edit",
                                page("posts", "edit"),
                            ))
                        },
                    )
                },
            )
            .unwrap();
        table
    }

    #[test]
    fn test_group_prefixes_compose() {
        let table = table();
        let route = table.route("filament.admin.resources.posts.edit").unwrap();
        assert_eq!(route.path, "/admin/posts/{record}/edit");
        assert_eq!(route.middleware, vec!["trace_requests", "authenticate"]);

        let index = table.route("filament.admin.resources.posts.index").unwrap();
        assert_eq!(index.path, "/admin/posts");
    }

    #[test]
    fn test_group_stack_is_unwound() {
        let table = table();
        table
            .add_route(RouteDefinition::new("health", "/health", RouteAction::Login))
            .unwrap();
        let route = table.route("health").unwrap();
        assert_eq!(route.path, "/health");
        assert!(route.middleware.is_empty());
    }

    #[test]
    fn test_duplicate_route_name() {
        let table = table();
        let result = table.register_route_group(RouteGroup::new("filament.admin.", "admin"), &mut |r| {
            r.add_route(RouteDefinition::new("resources.posts.index", "/other", RouteAction::Login))
        });
        assert!(matches!(result, Err(RoutingError::DuplicateRouteName(_))));
    }

    #[test]
    fn test_resolve_url() {
        let table = table();
        let params = RouteParameters::from([("record", json!(7)), ("tenant", json!(null))]);

        let url = table
            .resolve_url("filament.admin.resources.posts.edit", &params, true)
            .unwrap();
        assert_eq!(url, "http://localhost:8080/admin/posts/7/edit");

        let relative = table
            .resolve_url("filament.admin.resources.posts.edit", &params, false)
            .unwrap();
        assert_eq!(relative, "/admin/posts/7/edit");
    }

    #[test]
    fn test_extra_parameters_become_query_string() {
        let table = table();
        let params = RouteParameters::new().with("page", 2).with("search", "a b");
        let url = table
            .resolve_url("filament.admin.resources.posts.index", &params, false)
            .unwrap();
        assert_eq!(url, "/admin/posts?page=2&search=a+b");
    }

    #[test]
    fn test_parameters_are_escaped_and_bind_back() {
        let table = table();
        let route = table.route("filament.admin.resources.posts.edit").unwrap();

        for (key, expected) in [
            ("c# & rust?x=1", "/admin/posts/c%23%20%26%20rust%3Fx%3D1/edit"),
            ("2024/rust", "/admin/posts/2024%2Frust/edit"),
            ("rust tips", "/admin/posts/rust%20tips/edit"),
        ] {
            let params = RouteParameters::new().with("record", key);
            let url = table
                .resolve_url("filament.admin.resources.posts.edit", &params, false)
                .unwrap();
            assert_eq!(url, expected);

            let bound = route.extract_parameters(&url).unwrap();
            assert_eq!(bound.get("record").map(String::as_str), Some(key));
        }
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let table = table();
        let params = RouteParameters::new().with("record", "..");
        let result = table.resolve_url("filament.admin.resources.posts.edit", &params, false);
        assert!(matches!(result, Err(RoutingError::InvalidParameter { parameter, .. }) if parameter == "record"));
    }

    #[test]
    fn test_unknown_route() {
        let table = table();
        let result = table.resolve_url("filament.admin.resources.posts.show", &RouteParameters::new(), true);
        assert!(matches!(result, Err(RoutingError::RouteNotFound(name)) if name.ends_with("show")));
    }

    #[test]
    fn test_missing_parameter() {
        let table = table();
        let result = table.resolve_url("filament.admin.resources.posts.edit", &RouteParameters::new(), true);
        assert!(matches!(result, Err(RoutingError::MissingParameter { .. })));
    }
}
