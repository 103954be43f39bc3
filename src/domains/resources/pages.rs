//! Page registrations: a page handler plus its path under the resource slug.

use serde::Serialize;

use crate::core::routing::{RouteAction, RouteDefinition};

/// Page name of the record list.
pub const INDEX: &str = "index";
/// Page name of the creation form.
pub const CREATE: &str = "create";
/// Page name of the edit form.
pub const EDIT: &str = "edit";
/// Page name of the read-only record view.
pub const VIEW: &str = "view";

/// A page handler and the path it is served at, relative to the resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRegistration {
    /// Page handler identifier.
    pub page: String,
    /// Path relative to the resource slug, `{record}` allowed.
    pub path: String,
}

impl PageRegistration {
    /// Register `page` at `path`.
    pub fn route(page: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            path: path.into(),
        }
    }

    /// The record list at `/`.
    pub fn index() -> Self {
        Self::route(INDEX, "/")
    }

    /// The creation form at `/create`.
    pub fn create() -> Self {
        Self::route(CREATE, "/create")
    }

    /// The edit form at `/{record}/edit`.
    pub fn edit() -> Self {
        Self::route(EDIT, "/{record}/edit")
    }

    /// The record view at `/{record}`.
    pub fn view() -> Self {
        Self::route(VIEW, "/{record}")
    }

    /// Whether the path binds a `{record}` parameter.
    pub fn binds_record(&self) -> bool {
        self.path.split('/').any(|segment| segment == "{record}")
    }

    /// Route definition registering this page as `name` of `resource_slug`.
    pub fn register_route(&self, name: &str, resource_slug: &str) -> RouteDefinition {
        RouteDefinition::new(
            name,
            self.path.clone(),
            RouteAction::ResourcePage {
                resource: resource_slug.to_string(),
                page: self.page.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_pages() {
        assert_eq!(PageRegistration::index().path, "/");
        assert_eq!(PageRegistration::create().path, "/create");
        assert_eq!(PageRegistration::edit().path, "/{record}/edit");
        assert_eq!(PageRegistration::view().path, "/{record}");
    }

    #[test]
    fn test_binds_record() {
        assert!(PageRegistration::edit().binds_record());
        assert!(PageRegistration::view().binds_record());
        assert!(!PageRegistration::create().binds_record());
    }

    #[test]
    fn test_register_route() {
        let route = PageRegistration::route("export", "/export").register_route("export", "posts");
        assert_eq!(route.name, "export");
        assert_eq!(route.path, "/export");
        assert_eq!(
            route.action,
            RouteAction::ResourcePage {
                resource: "posts".to_string(),
                page: "export".to_string(),
            }
        );
    }
}
