//! Declarative resource configuration.
//!
//! A [`ResourceDescriptor`] is built once at boot and shared read-only
//! afterwards. Every field is independently optional; the conventions that
//! fill the gaps live in [`super::Resource`].

use indexmap::IndexMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use super::pages::PageRegistration;
use super::search::GlobalSearchResultAction;
use crate::core::context::RequestContext;
use crate::core::query::{Query, Record};

/// Default cap on global search results per resource.
pub const DEFAULT_GLOBAL_SEARCH_RESULTS_LIMIT: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// Narrows a query to the records owned by a tenant.
pub type ScopeToTenantFn = Arc<dyn Fn(&mut Query, &Record) + Send + Sync>;
/// Narrows the global search corpus.
pub type GlobalSearchQueryFn = Arc<dyn Fn(&mut Query, &RequestContext) + Send + Sync>;
/// Computes a navigation badge or its colour.
pub type NavigationBadgeFn = Arc<dyn Fn(&RequestContext) -> Option<String> + Send + Sync>;
/// Title of a global search result.
pub type ResultTitleFn = Arc<dyn Fn(&Record) -> String + Send + Sync>;
/// Label/value details of a global search result.
pub type ResultDetailsFn = Arc<dyn Fn(&Record) -> IndexMap<String, String> + Send + Sync>;
/// Actions offered next to a global search result.
pub type ResultActionsFn = Arc<dyn Fn(&Record) -> Vec<GlobalSearchResultAction> + Send + Sync>;

/// Overridable behaviour. Unset hooks fall back to the defaults in
/// [`super::Resource`].
#[derive(Clone, Default)]
pub struct ResourceHooks {
    pub scope_to_tenant: Option<ScopeToTenantFn>,
    pub global_search_query: Option<GlobalSearchQueryFn>,
    pub navigation_badge: Option<NavigationBadgeFn>,
    pub navigation_badge_color: Option<NavigationBadgeFn>,
    pub global_search_result_title: Option<ResultTitleFn>,
    pub global_search_result_details: Option<ResultDetailsFn>,
    pub global_search_result_actions: Option<ResultActionsFn>,
}

impl ResourceHooks {
    pub fn scope_to_tenant(mut self, f: impl Fn(&mut Query, &Record) + Send + Sync + 'static) -> Self {
        self.scope_to_tenant = Some(Arc::new(f));
        self
    }

    pub fn global_search_query(
        mut self,
        f: impl Fn(&mut Query, &RequestContext) + Send + Sync + 'static,
    ) -> Self {
        self.global_search_query = Some(Arc::new(f));
        self
    }

    pub fn navigation_badge(
        mut self,
        f: impl Fn(&RequestContext) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.navigation_badge = Some(Arc::new(f));
        self
    }

    pub fn navigation_badge_color(
        mut self,
        f: impl Fn(&RequestContext) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.navigation_badge_color = Some(Arc::new(f));
        self
    }

    pub fn global_search_result_title(
        mut self,
        f: impl Fn(&Record) -> String + Send + Sync + 'static,
    ) -> Self {
        self.global_search_result_title = Some(Arc::new(f));
        self
    }

    pub fn global_search_result_details(
        mut self,
        f: impl Fn(&Record) -> IndexMap<String, String> + Send + Sync + 'static,
    ) -> Self {
        self.global_search_result_details = Some(Arc::new(f));
        self
    }

    pub fn global_search_result_actions(
        mut self,
        f: impl Fn(&Record) -> Vec<GlobalSearchResultAction> + Send + Sync + 'static,
    ) -> Self {
        self.global_search_result_actions = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ResourceHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHooks")
            .field("scope_to_tenant", &self.scope_to_tenant.is_some())
            .field("global_search_query", &self.global_search_query.is_some())
            .field("navigation_badge", &self.navigation_badge.is_some())
            .field("navigation_badge_color", &self.navigation_badge_color.is_some())
            .field("global_search_result_title", &self.global_search_result_title.is_some())
            .field("global_search_result_details", &self.global_search_result_details.is_some())
            .field("global_search_result_actions", &self.global_search_result_actions.is_some())
            .finish()
    }
}

/// Navigation entry settings.
#[derive(Debug, Clone)]
pub struct NavigationSettings {
    pub group: Option<String>,
    pub icon: Option<String>,
    pub active_icon: Option<String>,
    pub label: Option<String>,
    pub sort: Option<i32>,
    pub should_register: bool,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            group: None,
            icon: None,
            active_icon: None,
            label: None,
            sort: None,
            should_register: true,
        }
    }
}

/// Configuration of one managed entity type.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    /// Declared type path, e.g. `app::filament::resources::blog::PostResource`.
    pub type_name: String,
    pub model: Option<String>,
    pub model_label: Option<String>,
    /// Legacy alias of `model_label`.
    pub label: Option<String>,
    pub plural_model_label: Option<String>,
    /// Legacy alias of `plural_model_label`.
    pub plural_label: Option<String>,
    pub breadcrumb: Option<String>,
    pub slug: Option<String>,
    pub record_title_attribute: Option<String>,
    /// Attribute bound to the `{record}` route parameter. Defaults to the key.
    pub record_route_key_name: Option<String>,
    pub globally_searchable: bool,
    pub globally_searchable_attributes: Option<Vec<String>>,
    pub global_search_results_limit: NonZeroUsize,
    pub ignore_policies: bool,
    /// Picked up by `Panel::discover_resources`.
    pub discovered: bool,
    pub navigation: NavigationSettings,
    pub pages: IndexMap<String, PageRegistration>,
    pub route_middleware: Vec<String>,
    pub tenant_ownership_key: Option<String>,
    pub hooks: ResourceHooks,
}

impl ResourceDescriptor {
    /// Describe the resource declared as `type_name`, with every other
    /// setting left to convention.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            model: None,
            model_label: None,
            label: None,
            plural_model_label: None,
            plural_label: None,
            breadcrumb: None,
            slug: None,
            record_title_attribute: None,
            record_route_key_name: None,
            globally_searchable: true,
            globally_searchable_attributes: None,
            global_search_results_limit: DEFAULT_GLOBAL_SEARCH_RESULTS_LIMIT,
            ignore_policies: false,
            discovered: true,
            navigation: NavigationSettings::default(),
            pages: IndexMap::new(),
            route_middleware: Vec::new(),
            tenant_ownership_key: None,
            hooks: ResourceHooks::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_model_label(mut self, label: impl Into<String>) -> Self {
        self.model_label = Some(label.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_plural_model_label(mut self, label: impl Into<String>) -> Self {
        self.plural_model_label = Some(label.into());
        self
    }

    pub fn with_plural_label(mut self, label: impl Into<String>) -> Self {
        self.plural_label = Some(label.into());
        self
    }

    pub fn with_breadcrumb(mut self, breadcrumb: impl Into<String>) -> Self {
        self.breadcrumb = Some(breadcrumb.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_record_title_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.record_title_attribute = Some(attribute.into());
        self
    }

    pub fn with_record_route_key_name(mut self, attribute: impl Into<String>) -> Self {
        self.record_route_key_name = Some(attribute.into());
        self
    }

    pub fn globally_searchable(mut self, searchable: bool) -> Self {
        self.globally_searchable = searchable;
        self
    }

    pub fn with_globally_searchable_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.globally_searchable_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_global_search_results_limit(mut self, limit: NonZeroUsize) -> Self {
        self.global_search_results_limit = limit;
        self
    }

    pub fn ignore_policies(mut self, ignore: bool) -> Self {
        self.ignore_policies = ignore;
        self
    }

    pub fn discovered(mut self, discovered: bool) -> Self {
        self.discovered = discovered;
        self
    }

    pub fn with_navigation_group(mut self, group: impl Into<String>) -> Self {
        self.navigation.group = Some(group.into());
        self
    }

    pub fn with_navigation_icon(mut self, icon: impl Into<String>) -> Self {
        self.navigation.icon = Some(icon.into());
        self
    }

    pub fn with_active_navigation_icon(mut self, icon: impl Into<String>) -> Self {
        self.navigation.active_icon = Some(icon.into());
        self
    }

    pub fn with_navigation_label(mut self, label: impl Into<String>) -> Self {
        self.navigation.label = Some(label.into());
        self
    }

    pub fn with_navigation_sort(mut self, sort: i32) -> Self {
        self.navigation.sort = Some(sort);
        self
    }

    pub fn should_register_navigation(mut self, register: bool) -> Self {
        self.navigation.should_register = register;
        self
    }

    /// Add or replace the page registered as `name`.
    pub fn with_page(mut self, name: impl Into<String>, page: PageRegistration) -> Self {
        self.pages.insert(name.into(), page);
        self
    }

    /// Register the conventional `index`, `create`, `edit` and `view` pages.
    pub fn with_crud_pages(self) -> Self {
        self.with_page(super::pages::INDEX, PageRegistration::index())
            .with_page(super::pages::CREATE, PageRegistration::create())
            .with_page(super::pages::EDIT, PageRegistration::edit())
            .with_page(super::pages::VIEW, PageRegistration::view())
    }

    pub fn with_route_middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_middleware = middleware.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tenant_ownership_key(mut self, key: impl Into<String>) -> Self {
        self.tenant_ownership_key = Some(key.into());
        self
    }

    pub fn with_hooks(mut self, hooks: ResourceHooks) -> Self {
        self.hooks = hooks;
        self
    }
}
