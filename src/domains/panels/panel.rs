//! Panel configuration and route registration.

use std::collections::HashSet;
use tracing::{debug, info};

use super::error::PanelError;
use crate::core::context::RequestContext;
use crate::core::routing::{RouteAction, RouteDefinition, RouteGroup};
use crate::domains::resources::navigation::group_navigation_items;
use crate::domains::resources::{
    GlobalSearchResultGroup, NamingStrategy, NavigationGroup, Resource, ResourceDescriptor,
    ResourceServices,
};

/// Route name of the login page, relative to the panel.
pub const LOGIN_ROUTE: &str = "auth.login";
/// Route name of the global search endpoint, relative to the panel.
pub const GLOBAL_SEARCH_ROUTE: &str = "global-search";

/// A configured admin panel: where it is mounted, what it serves and which
/// middleware guards it.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    id: String,
    path: Option<String>,
    is_default: bool,
    login: bool,
    resources: Vec<ResourceDescriptor>,
    pages: Vec<String>,
    middleware: Vec<String>,
    auth_middleware: Vec<String>,
    tenant_model: Option<String>,
}

impl Panel {
    /// Create an unconfigured panel.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// URL prefix. Defaults to the id.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into().trim_matches('/').to_string());
        self
    }

    /// Serve this panel when no panel is named explicitly.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Enable the login page.
    pub fn login(mut self) -> Self {
        self.login = true;
        self
    }

    /// Add resources regardless of their `discovered` flag.
    pub fn resources(mut self, resources: impl IntoIterator<Item = ResourceDescriptor>) -> Self {
        self.resources.extend(resources);
        self
    }

    /// Add the discoverable resources among `candidates`.
    pub fn discover_resources(
        mut self,
        candidates: impl IntoIterator<Item = ResourceDescriptor>,
    ) -> Self {
        self.resources
            .extend(candidates.into_iter().filter(|descriptor| descriptor.discovered));
        self
    }

    /// Add standalone pages by slug.
    pub fn pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages.extend(pages.into_iter().map(Into::into));
        self
    }

    /// Middleware applied to every panel route, outermost first.
    pub fn middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware = middleware.into_iter().map(Into::into).collect();
        self
    }

    /// Middleware applied to routes that require a signed-in user.
    pub fn auth_middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth_middleware = middleware.into_iter().map(Into::into).collect();
        self
    }

    /// Enable tenancy: authenticated routes gain a `{tenant}` prefix bound to
    /// a record of `model`.
    pub fn tenant(mut self, model: impl Into<String>) -> Self {
        self.tenant_model = Some(model.into());
        self
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.id)
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn has_login(&self) -> bool {
        self.login
    }

    pub fn has_tenancy(&self) -> bool {
        self.tenant_model.is_some()
    }

    pub fn tenant_model(&self) -> Option<&str> {
        self.tenant_model.as_deref()
    }

    pub fn get_resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn get_pages(&self) -> &[String] {
        &self.pages
    }

    pub fn get_middleware(&self) -> &[String] {
        &self.middleware
    }

    pub fn get_auth_middleware(&self) -> &[String] {
        &self.auth_middleware
    }

    /// Full route name of a route relative to this panel.
    pub fn route_name(&self, name: &str) -> String {
        format!("filament.{}.{}", self.id, name)
    }

    /// Resources resolved against `services`.
    pub fn resolve<'a>(
        &'a self,
        services: &'a ResourceServices,
    ) -> impl Iterator<Item = Resource<'a>> + 'a {
        self.resources
            .iter()
            .map(move |descriptor| Resource::new(descriptor, services))
    }

    /// The resource served under `slug`.
    pub fn resource<'a>(&'a self, services: &'a ResourceServices, slug: &str) -> Option<Resource<'a>> {
        self.resolve(services).find(|resource| resource.slug() == slug)
    }

    /// Register the panel's routes with `services.router`.
    ///
    /// Fails before registering anything when a slug is not URL-safe or two
    /// resources share a slug.
    pub fn register_routes(&self, services: &ResourceServices) -> Result<(), PanelError> {
        let mut slugs = HashSet::new();
        for resource in self.resolve(services) {
            let slug = resource.slug();
            if !NamingStrategy::is_valid_slug(&slug) {
                return Err(PanelError::InvalidSlug {
                    panel: self.id.clone(),
                    slug,
                });
            }
            if !slugs.insert(slug.clone()) {
                return Err(PanelError::duplicate_slug(&self.id, slug));
            }
        }

        let panel_group = RouteGroup::new(format!("filament.{}.", self.id), self.get_path())
            .middleware(self.middleware.clone());
        let tenant_prefix = if self.has_tenancy() { "{tenant}" } else { "" };

        services.router.register_route_group(panel_group, &mut |router| {
            if self.login {
                router.add_route(RouteDefinition::new(LOGIN_ROUTE, "/login", RouteAction::Login))?;
            }

            let authenticated = RouteGroup::new("", tenant_prefix).middleware(self.auth_middleware.clone());
            router.register_route_group(authenticated, &mut |router| {
                router.register_route_group(RouteGroup::new("pages.", ""), &mut |router| {
                    for page in &self.pages {
                        router.add_route(RouteDefinition::new(
                            page.as_str(),
                            format!("/{page}"),
                            RouteAction::Page { page: page.clone() },
                        ))?;
                    }
                    Ok(())
                })?;

                router.register_route_group(RouteGroup::new("resources.", ""), &mut |router| {
                    for resource in self.resolve(services) {
                        resource.routes(router)?;
                    }
                    Ok(())
                })?;

                router.add_route(RouteDefinition::new(
                    GLOBAL_SEARCH_ROUTE,
                    "/global-search",
                    RouteAction::GlobalSearch,
                ))
            })
        })?;

        info!(
            "Registered panel '{}' at /{} with {} resources",
            self.id,
            self.get_path(),
            self.resources.len()
        );
        Ok(())
    }

    /// Navigation groups visible to the context's user.
    pub fn navigation(
        &self,
        ctx: &RequestContext,
        services: &ResourceServices,
    ) -> Result<Vec<NavigationGroup>, PanelError> {
        let mut items = Vec::new();
        for resource in self.resolve(services) {
            items.extend(resource.register_navigation_items(ctx)?);
        }
        Ok(group_navigation_items(items))
    }

    /// Search every globally searchable resource. Resources without
    /// results are left out.
    pub fn global_search(
        &self,
        ctx: &RequestContext,
        services: &ResourceServices,
        text: &str,
    ) -> Result<Vec<GlobalSearchResultGroup>, PanelError> {
        let mut groups = Vec::new();
        for resource in self.resolve(services) {
            if !resource.can_globally_search(ctx) {
                debug!("Skipping {} in global search", resource.slug());
                continue;
            }

            let results = resource.global_search_results(ctx, text)?;
            if results.is_empty() {
                continue;
            }

            groups.push(GlobalSearchResultGroup {
                label: resource.plural_model_label(ctx),
                results,
            });
        }
        Ok(groups)
    }
}
