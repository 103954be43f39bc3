//! Named routes and URL generation.
//!
//! A [`Router`] collects routes during boot, usually inside nested
//! [`RouteGroup`]s that contribute a name prefix, a path prefix and
//! middleware, then generates URLs from route names at request time.
//!
//! - `table.rs` - [`RouteTable`], the in-process router
//! - `error.rs` - [`RoutingError`]

mod error;
mod table;

pub use error::RoutingError;
pub use table::RouteTable;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::query::{Record, value_to_string};

/// What a route does when matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteAction {
    /// The panel login page.
    Login,

    /// A standalone panel page.
    Page {
        /// Page slug.
        page: String,
    },

    /// A page of a resource.
    ResourcePage {
        /// Resource slug.
        resource: String,
        /// Page name (the key in the resource's page map).
        page: String,
    },

    /// The panel's global search endpoint.
    GlobalSearch,
}

/// A route as declared inside a group, relative to the group's prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    /// Name relative to the enclosing groups.
    pub name: String,
    /// Path relative to the enclosing groups, `{param}` placeholders allowed.
    pub path: String,
    /// Handler.
    pub action: RouteAction,
}

impl RouteDefinition {
    /// Declare a route.
    pub fn new(name: impl Into<String>, path: impl Into<String>, action: RouteAction) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            action,
        }
    }
}

/// Attributes shared by every route registered inside a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGroup {
    /// Prepended to route names (e.g. `blog-posts.`).
    pub name_prefix: String,
    /// Prepended to route paths.
    pub path_prefix: String,
    /// Middleware identifiers applied to the group's routes, outermost first.
    pub middleware: Vec<String>,
}

impl RouteGroup {
    /// Create a group.
    pub fn new(name_prefix: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            path_prefix: path_prefix.into(),
            middleware: Vec::new(),
        }
    }

    /// Set the group's middleware.
    pub fn middleware(mut self, middleware: Vec<String>) -> Self {
        self.middleware = middleware;
        self
    }
}

/// A fully resolved route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Full dotted name.
    pub name: String,
    /// Absolute path starting with `/`.
    pub path: String,
    /// Middleware identifiers, outermost first.
    pub middleware: Vec<String>,
    /// Handler.
    pub action: RouteAction,
}

impl Route {
    /// Names of the `{param}` placeholders in the path, in order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter_map(placeholder)
            .collect()
    }

    /// Match `path` against this route's path and capture its parameters.
    pub fn extract_parameters(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let template: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();
        let actual: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if template.len() != actual.len() {
            return None;
        }

        let mut parameters = BTreeMap::new();
        for (expected, segment) in template.iter().zip(actual) {
            match placeholder(expected) {
                Some(name) => {
                    parameters.insert(name.to_string(), decode_segment(segment));
                }
                None if *expected == segment => {}
                None => return None,
            }
        }

        Some(parameters)
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Everything but RFC 3986 unreserved characters is escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Escape a parameter value so it stays a single path segment.
pub(crate) fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Parameters for URL generation. `null` values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteParameters(BTreeMap<String, Value>);

impl RouteParameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Bind `record` under `name` using its route key.
    pub fn with_record(self, name: impl Into<String>, record: &Record, key_name: Option<&str>) -> Self {
        let key = record.route_key(key_name).map_or(Value::Null, Value::String);
        self.with(name, key)
    }

    /// Set a parameter only when it is absent or null.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: Value) {
        let slot = self.0.entry(name.into()).or_insert(Value::Null);
        if slot.is_null() {
            *slot = value;
        }
    }

    /// Get a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Render a parameter for use in a URL. `None` when absent or null.
    pub fn value_string(&self, name: &str) -> Option<String> {
        self.0.get(name).and_then(value_to_string)
    }

    /// Iterate parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for RouteParameters {
    fn from(pairs: [(K, V); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Callback that registers routes inside a group.
pub type RegisterRoutes<'a> = dyn FnMut(&dyn Router) -> Result<(), RoutingError> + 'a;

/// Registers named routes and generates URLs for them.
///
/// Registration happens during boot; afterwards a router is only read.
pub trait Router: Send + Sync {
    /// Run `register` with `group`'s name prefix, path prefix and middleware
    /// applied to every route it adds. Groups nest.
    fn register_route_group(
        &self,
        group: RouteGroup,
        register: &mut RegisterRoutes<'_>,
    ) -> Result<(), RoutingError>;

    /// Register a route inside the current groups.
    fn add_route(&self, route: RouteDefinition) -> Result<(), RoutingError>;

    /// Build the URL of the route called `name`.
    fn resolve_url(
        &self,
        name: &str,
        parameters: &RouteParameters,
        absolute: bool,
    ) -> Result<String, RoutingError>;
}
