//! Resolution of a [`ResourceDescriptor`] into labels, authorization
//! decisions, scoped queries, search results, URLs and routes.
//!
//! A [`Resource`] is a cheap borrowed view: the descriptor plus the shared
//! [`ResourceServices`]. Request-dependent operations take the
//! [`RequestContext`] explicitly.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::authorization::{Action, AuthorizationGate, Subject};
use super::descriptor::ResourceDescriptor;
use super::error::ResourceError;
use super::naming::NamingStrategy;
use super::navigation::{DEFAULT_NAVIGATION_ICON, NavigationItem};
use super::pages::{self, PageRegistration};
use super::search::{GlobalSearchResult, apply_global_search_attribute_constraint, tokenize};
use crate::core::context::RequestContext;
use crate::core::i18n::Pluralization;
use crate::core::query::{Query, QueryProvider, Record, rules_for};
use crate::core::routing::{RouteGroup, RouteParameters, Router, RoutingError};

/// Collaborators shared by every resource of a panel.
#[derive(Clone)]
pub struct ResourceServices {
    pub gate: Arc<dyn AuthorizationGate>,
    pub queries: Arc<dyn QueryProvider>,
    pub router: Arc<dyn Router>,
    pub naming: NamingStrategy,
    pub pluralization: Pluralization,
}

impl ResourceServices {
    /// Services with the default naming conventions and English plurals.
    pub fn new(
        gate: Arc<dyn AuthorizationGate>,
        queries: Arc<dyn QueryProvider>,
        router: Arc<dyn Router>,
    ) -> Self {
        Self {
            gate,
            queries,
            router,
            naming: NamingStrategy::default(),
            pluralization: Pluralization::default(),
        }
    }

    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_pluralization(mut self, pluralization: Pluralization) -> Self {
        self.pluralization = pluralization;
        self
    }
}

impl fmt::Debug for ResourceServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceServices")
            .field("driver", &self.queries.driver_name())
            .field("naming", &self.naming)
            .field("pluralization", &self.pluralization)
            .finish_non_exhaustive()
    }
}

/// Options for [`Resource::get_url_with`].
#[derive(Debug, Clone)]
pub struct UrlOptions<'a> {
    /// Key in the resource's page map.
    pub page: &'a str,
    pub parameters: RouteParameters,
    pub absolute: bool,
    /// Panel id; defaults to the context's panel.
    pub context: Option<&'a str>,
    /// Tenant bound to `{tenant}`; defaults to the routable tenant.
    pub tenant: Option<&'a Record>,
}

impl Default for UrlOptions<'_> {
    fn default() -> Self {
        Self {
            page: pages::INDEX,
            parameters: RouteParameters::new(),
            absolute: true,
            context: None,
            tenant: None,
        }
    }
}

/// A descriptor resolved against the panel's services.
#[derive(Debug, Clone, Copy)]
pub struct Resource<'a> {
    descriptor: &'a ResourceDescriptor,
    services: &'a ResourceServices,
}

impl<'a> Resource<'a> {
    pub fn new(descriptor: &'a ResourceDescriptor, services: &'a ResourceServices) -> Self {
        Self {
            descriptor,
            services,
        }
    }

    pub fn descriptor(&self) -> &'a ResourceDescriptor {
        self.descriptor
    }

    // Identity and labels

    /// Model identifier managed by this resource.
    pub fn model(&self) -> String {
        match &self.descriptor.model {
            Some(model) => model.clone(),
            None => self.services.naming.model_identifier(&self.descriptor.type_name),
        }
    }

    pub fn model_label(&self) -> String {
        self.descriptor
            .model_label
            .as_ref()
            .or(self.descriptor.label.as_ref())
            .cloned()
            .unwrap_or_else(|| self.services.naming.model_label(&self.model()))
    }

    /// Plural label: explicit values win, then the context locale's rules.
    /// Locales without rules keep the singular label.
    pub fn plural_model_label(&self, ctx: &RequestContext) -> String {
        if let Some(label) = self
            .descriptor
            .plural_model_label
            .as_ref()
            .or(self.descriptor.plural_label.as_ref())
        {
            return label.clone();
        }

        let label = self.model_label();
        match self.services.pluralization.for_locale(ctx.locale()) {
            Some(pluralizer) => pluralizer.plural(&label),
            None => label,
        }
    }

    /// URL segment(s) of the resource, e.g. `blog/posts`.
    pub fn slug(&self) -> String {
        match &self.descriptor.slug {
            Some(slug) => slug.clone(),
            None => self.services.naming.slug(&self.descriptor.type_name),
        }
    }

    pub fn breadcrumb(&self, ctx: &RequestContext) -> String {
        match &self.descriptor.breadcrumb {
            Some(breadcrumb) => breadcrumb.clone(),
            None => NamingStrategy::headline(&self.plural_model_label(ctx)),
        }
    }

    pub fn navigation_label(&self, ctx: &RequestContext) -> String {
        match &self.descriptor.navigation.label {
            Some(label) => label.clone(),
            None => NamingStrategy::headline(&self.plural_model_label(ctx)),
        }
    }

    pub fn has_record_title(&self) -> bool {
        self.descriptor.record_title_attribute.is_some()
    }

    /// The record's title attribute, else the model label.
    pub fn record_title(&self, record: Option<&Record>) -> String {
        record
            .zip(self.descriptor.record_title_attribute.as_deref())
            .and_then(|(record, attribute)| record.attribute_string(attribute))
            .unwrap_or_else(|| self.model_label())
    }

    // Authorization

    /// Whether the current user may perform `action`.
    ///
    /// Models without a policy, and policies without a handler for the
    /// action, allow it.
    pub fn can(&self, ctx: &RequestContext, action: &str, record: Option<&Record>) -> bool {
        if self.descriptor.ignore_policies {
            return true;
        }

        let model = self.model();
        let Some(policy) = self.services.gate.policy_for(&model) else {
            return true;
        };
        if !policy.has(action) {
            return true;
        }

        let subject = match record {
            Some(record) => Subject::Record(record),
            None => Subject::Model(&model),
        };
        self.services
            .gate
            .check(ctx.authenticated_user(), action, subject)
    }

    /// Like [`Resource::can`] but fails with [`ResourceError::AccessDenied`].
    pub fn authorize(
        &self,
        ctx: &RequestContext,
        action: Action,
        record: Option<&Record>,
    ) -> Result<(), ResourceError> {
        if self.can(ctx, action.as_str(), record) {
            return Ok(());
        }
        Err(ResourceError::access_denied(format!(
            "{} on {}",
            action,
            self.model()
        )))
    }

    pub fn can_view_any(&self, ctx: &RequestContext) -> bool {
        self.can(ctx, Action::ViewAny.as_str(), None)
    }

    pub fn can_create(&self, ctx: &RequestContext) -> bool {
        self.can(ctx, Action::Create.as_str(), None)
    }

    pub fn can_edit(&self, ctx: &RequestContext, record: &Record) -> bool {
        self.can(ctx, Action::Update.as_str(), Some(record))
    }

    pub fn can_delete(&self, ctx: &RequestContext, record: &Record) -> bool {
        self.can(ctx, Action::Delete.as_str(), Some(record))
    }

    pub fn can_delete_any(&self, ctx: &RequestContext) -> bool {
        self.can(ctx, Action::DeleteAny.as_str(), None)
    }

    pub fn can_force_delete(&self, ctx: &RequestContext, record: &Record) -> bool {
        self.can(ctx, Action::ForceDelete.as_str(), Some(record))
    }

    pub fn can_force_delete_any(&self, ctx: &RequestContext) -> bool {
        self.can(ctx, Action::ForceDeleteAny.as_str(), None)
    }

    pub fn can_reorder(&self, ctx: &RequestContext) -> bool {
        self.can(ctx, Action::Reorder.as_str(), None)
    }

    pub fn can_replicate(&self, ctx: &RequestContext, record: &Record) -> bool {
        self.can(ctx, Action::Replicate.as_str(), Some(record))
    }

    pub fn can_restore(&self, ctx: &RequestContext, record: &Record) -> bool {
        self.can(ctx, Action::Restore.as_str(), Some(record))
    }

    pub fn can_restore_any(&self, ctx: &RequestContext) -> bool {
        self.can(ctx, Action::RestoreAny.as_str(), None)
    }

    pub fn can_view(&self, ctx: &RequestContext, record: &Record) -> bool {
        self.can(ctx, Action::View.as_str(), Some(record))
    }

    /// Searchable, with at least one searchable attribute, and listable by
    /// the current user.
    pub fn can_globally_search(&self, ctx: &RequestContext) -> bool {
        self.descriptor.globally_searchable
            && !self.globally_searchable_attributes().is_empty()
            && self.can_view_any(ctx)
    }

    // Queries

    /// Foreign key tying records to `tenant`.
    pub fn tenant_ownership_key(&self, tenant: &Record) -> String {
        match &self.descriptor.tenant_ownership_key {
            Some(key) => key.clone(),
            None => self.services.naming.tenant_ownership_key(&tenant.model),
        }
    }

    /// Base query for the model, scoped to the current tenant if any.
    pub fn eloquent_query(&self, ctx: &RequestContext) -> Query {
        let mut query = self.services.queries.query(&self.model());

        if let Some(tenant) = ctx.current_tenant() {
            match &self.descriptor.hooks.scope_to_tenant {
                Some(scope) => scope(&mut query, tenant),
                None => {
                    query.where_belongs_to(self.tenant_ownership_key(tenant), tenant.key.clone());
                }
            }
        }

        query
    }

    /// [`Resource::eloquent_query`] narrowed for global search.
    pub fn global_search_eloquent_query(&self, ctx: &RequestContext) -> Query {
        let mut query = self.eloquent_query(ctx);
        if let Some(narrow) = &self.descriptor.hooks.global_search_query {
            narrow(&mut query, ctx);
        }
        query
    }

    /// Record bound to `key` in the scoped query, if any.
    pub fn resolve_record_route_binding(
        &self,
        ctx: &RequestContext,
        key: &str,
    ) -> Result<Option<Record>, ResourceError> {
        let column = self
            .descriptor
            .record_route_key_name
            .as_deref()
            .unwrap_or("id");

        let mut query = self.eloquent_query(ctx);
        query.where_(column, crate::core::query::Operator::Eq, key);
        Ok(self.services.queries.first(&query)?)
    }

    // Global search

    pub fn globally_searchable_attributes(&self) -> Vec<String> {
        match &self.descriptor.globally_searchable_attributes {
            Some(attributes) => attributes.clone(),
            None => self
                .descriptor
                .record_title_attribute
                .iter()
                .cloned()
                .collect(),
        }
    }

    /// Search query for `text`, or `None` when the text has no words.
    pub fn global_search_query(&self, ctx: &RequestContext, text: &str) -> Option<Query> {
        let words = tokenize(text);
        if words.is_empty() {
            return None;
        }

        let mut query = self.global_search_eloquent_query(ctx);
        let attributes = self.globally_searchable_attributes();
        let queries = &self.services.queries;
        let rules = rules_for(queries.driver_name());
        let model = query.model().to_string();

        for word in words {
            query.where_nested(|group| {
                let mut is_first = true;
                for attribute in &attributes {
                    let translatable = queries.is_translatable_attribute(&model, attribute);
                    apply_global_search_attribute_constraint(
                        group,
                        attribute,
                        word,
                        is_first,
                        rules,
                        translatable,
                    );
                    is_first = false;
                }
            });
        }

        query.limit(self.descriptor.global_search_results_limit.get());
        Some(query)
    }

    /// Records matching `text`, capped at the results limit. Records the
    /// user can neither edit nor view are dropped.
    pub fn global_search_results(
        &self,
        ctx: &RequestContext,
        text: &str,
    ) -> Result<Vec<GlobalSearchResult>, ResourceError> {
        let Some(query) = self.global_search_query(ctx, text) else {
            debug!("Empty global search for {}, skipping query", self.slug());
            return Ok(Vec::new());
        };

        let (sql, bindings) = query.to_sql();
        debug!("Global search for {}: {} {:?}", self.slug(), sql, bindings);

        let hooks = &self.descriptor.hooks;
        let mut results = Vec::new();
        for record in self.services.queries.get(&query)? {
            let Some(url) = self.global_search_result_url(ctx, &record)? else {
                continue;
            };

            results.push(GlobalSearchResult {
                title: match &hooks.global_search_result_title {
                    Some(title) => title(&record),
                    None => self.record_title(Some(&record)),
                },
                url,
                details: hooks
                    .global_search_result_details
                    .as_ref()
                    .map_or_else(IndexMap::new, |details| details(&record)),
                actions: hooks
                    .global_search_result_actions
                    .as_ref()
                    .map_or_else(Vec::new, |actions| actions(&record)),
            });
        }

        Ok(results)
    }

    /// Edit page when allowed, else view page when allowed, else `None`.
    pub fn global_search_result_url(
        &self,
        ctx: &RequestContext,
        record: &Record,
    ) -> Result<Option<String>, ResourceError> {
        let parameters = || {
            RouteParameters::new().with_record(
                "record",
                record,
                self.descriptor.record_route_key_name.as_deref(),
            )
        };

        if self.has_page(pages::EDIT) && self.can_edit(ctx, record) {
            return self.get_url(ctx, pages::EDIT, parameters()).map(Some);
        }

        if self.has_page(pages::VIEW) && self.can_view(ctx, record) {
            return self.get_url(ctx, pages::VIEW, parameters()).map(Some);
        }

        Ok(None)
    }

    // Routing

    /// `filament.{panel}.resources.{slug}`.
    pub fn route_base_name(&self, ctx: &RequestContext, context: Option<&str>) -> String {
        let context = context.unwrap_or(ctx.current_context_id());
        format!("filament.{}.resources.{}", context, self.slug())
    }

    pub fn get_url(
        &self,
        ctx: &RequestContext,
        page: &str,
        parameters: RouteParameters,
    ) -> Result<String, ResourceError> {
        self.get_url_with(
            ctx,
            UrlOptions {
                page,
                parameters,
                ..UrlOptions::default()
            },
        )
    }

    /// URL of a page. `{tenant}` defaults to the explicit tenant, else the
    /// routable tenant, else null.
    pub fn get_url_with(
        &self,
        ctx: &RequestContext,
        options: UrlOptions<'_>,
    ) -> Result<String, ResourceError> {
        let mut parameters = options.parameters;
        let tenant = options
            .tenant
            .or_else(|| ctx.routable_tenant())
            .map_or(Value::Null, |tenant| tenant.key.clone());
        parameters.insert_if_absent("tenant", tenant);

        let name = format!(
            "{}.{}",
            self.route_base_name(ctx, options.context),
            options.page
        );
        Ok(self
            .services
            .router
            .resolve_url(&name, &parameters, options.absolute)?)
    }

    /// Register every page under the `{slug}.` / `/{slug}` group.
    pub fn routes(&self, router: &dyn Router) -> Result<(), RoutingError> {
        let slug = self.slug();
        let group = RouteGroup::new(format!("{slug}."), format!("/{slug}"))
            .middleware(self.descriptor.route_middleware.clone());

        router.register_route_group(group, &mut |router| {
            for (name, page) in &self.descriptor.pages {
                router.add_route(page.register_route(name, &slug))?;
            }
            Ok(())
        })
    }

    pub fn has_page(&self, page: &str) -> bool {
        self.descriptor.pages.contains_key(page)
    }

    pub fn pages(&self) -> &'a IndexMap<String, PageRegistration> {
        &self.descriptor.pages
    }

    // Navigation

    pub fn navigation_items(&self, ctx: &RequestContext) -> Result<Vec<NavigationItem>, ResourceError> {
        let navigation = &self.descriptor.navigation;
        let hooks = &self.descriptor.hooks;
        let icon = navigation
            .icon
            .clone()
            .unwrap_or_else(|| DEFAULT_NAVIGATION_ICON.to_string());

        Ok(vec![NavigationItem {
            label: self.navigation_label(ctx),
            group: navigation.group.clone(),
            active_icon: navigation.active_icon.clone().unwrap_or_else(|| icon.clone()),
            icon,
            active_route_pattern: format!("{}.*", self.route_base_name(ctx, None)),
            badge: hooks.navigation_badge.as_ref().and_then(|badge| badge(ctx)),
            badge_color: hooks
                .navigation_badge_color
                .as_ref()
                .and_then(|color| color(ctx)),
            sort: navigation.sort,
            url: self.get_url(ctx, pages::INDEX, RouteParameters::new())?,
        }])
    }

    /// Navigation items, or none when navigation is disabled or the user
    /// cannot list records.
    pub fn register_navigation_items(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<NavigationItem>, ResourceError> {
        if !self.descriptor.navigation.should_register || !self.can_view_any(ctx) {
            return Ok(Vec::new());
        }
        self.navigation_items(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::User;
    use crate::core::query::MemoryStore;
    use crate::core::routing::{RouteDefinition, RouteTable};
    use crate::domains::resources::authorization::{Policy, PolicyGate};
    use crate::domains::resources::descriptor::ResourceHooks;
    use crate::domains::resources::search::GlobalSearchResultAction;
    use serde_json::json;
    use std::num::NonZeroUsize;
    use std::sync::Mutex;

    const POST: &str = "app::models::Post";
    const BLOG_POST_RESOURCE: &str = "app::filament::resources::BlogPostResource";

    #[derive(Default)]
    struct RecordingRouter {
        calls: Mutex<Vec<(String, RouteParameters, bool)>>,
    }

    impl Router for RecordingRouter {
        fn register_route_group(
            &self,
            _group: RouteGroup,
            register: &mut crate::core::routing::RegisterRoutes<'_>,
        ) -> Result<(), RoutingError> {
            register(self)
        }

        fn add_route(&self, _route: RouteDefinition) -> Result<(), RoutingError> {
            Ok(())
        }

        fn resolve_url(
            &self,
            name: &str,
            parameters: &RouteParameters,
            absolute: bool,
        ) -> Result<String, RoutingError> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), parameters.clone(), absolute));
            Ok(format!("https://panel.test/{name}"))
        }
    }

    fn services_with(gate: PolicyGate, store: Arc<MemoryStore>, router: Arc<dyn Router>) -> ResourceServices {
        ResourceServices::new(Arc::new(gate), store, router)
    }

    fn services(gate: PolicyGate) -> ResourceServices {
        services_with(
            gate,
            Arc::new(MemoryStore::new("mysql")),
            Arc::new(RecordingRouter::default()),
        )
    }

    fn ctx() -> RequestContext {
        RequestContext::new("custom")
    }

    fn posts() -> ResourceDescriptor {
        ResourceDescriptor::new("app::filament::resources::PostResource")
            .with_record_title_attribute("title")
            .with_page("index", PageRegistration::index())
            .with_page("edit", PageRegistration::edit())
            .with_page("view", PageRegistration::view())
    }

    fn deny_all() -> PolicyGate {
        PolicyGate::new().policy(
            POST,
            Policy::new()
                .define("view_any", |_, _| false)
                .define("update", |_, _| false)
                .define("view", |_, _| false)
                .define("delete", |_, _| false),
        )
    }

    #[test]
    fn test_identity_defaults() {
        let services = services(PolicyGate::new());
        let descriptor = ResourceDescriptor::new(BLOG_POST_RESOURCE);
        let resource = Resource::new(&descriptor, &services);

        assert_eq!(resource.model(), "app::models::BlogPost");
        assert_eq!(resource.slug(), "blog-posts");
        assert_eq!(resource.model_label(), "blog post");
        assert_eq!(resource.plural_model_label(&ctx()), "blog posts");
        assert_eq!(resource.breadcrumb(&ctx()), "Blog Posts");
        assert_eq!(resource.navigation_label(&ctx()), "Blog Posts");
    }

    #[test]
    fn test_explicit_overrides_win() {
        let services = services(PolicyGate::new());
        let descriptor = ResourceDescriptor::new("app::filament::resources::OctopusResource")
            .with_model("zoo::Cephalopod")
            .with_slug("sea/octopi")
            .with_label("octopus")
            .with_plural_model_label("Octopi");
        let resource = Resource::new(&descriptor, &services);

        assert_eq!(resource.model(), "zoo::Cephalopod");
        assert_eq!(resource.slug(), "sea/octopi");
        assert_eq!(
            resource.route_base_name(&ctx(), None),
            "filament.custom.resources.sea/octopi"
        );
        assert_eq!(resource.model_label(), "octopus");
        assert_eq!(resource.plural_model_label(&ctx()), "Octopi");
        assert_eq!(resource.plural_model_label(&ctx().with_locale("xx")), "Octopi");
    }

    #[test]
    fn test_locale_without_pluralization_keeps_singular() {
        let services = services(PolicyGate::new());
        let descriptor = ResourceDescriptor::new(BLOG_POST_RESOURCE);
        let resource = Resource::new(&descriptor, &services);

        assert_eq!(resource.plural_model_label(&ctx().with_locale("en_GB")), "blog posts");
        assert_eq!(resource.plural_model_label(&ctx().with_locale("de")), "blog post");
        assert_eq!(resource.slug(), "blog-posts");
    }

    #[test]
    fn test_record_title() {
        let services = services(PolicyGate::new());
        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);
        let record = Record::new(POST, 1).with_attribute("title", "Hello");

        assert!(resource.has_record_title());
        assert_eq!(resource.record_title(Some(&record)), "Hello");
        assert_eq!(resource.record_title(Some(&Record::new(POST, 2))), "post");
        assert_eq!(resource.record_title(None), "post");
    }

    #[test]
    fn test_fail_open_without_policy() {
        let services = services(PolicyGate::new());
        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);
        let record = Record::new(POST, 1);

        assert!(resource.can_view_any(&ctx()));
        assert!(resource.can_delete(&ctx(), &record));
        assert!(resource.can_force_delete_any(&ctx()));
    }

    #[test]
    fn test_fail_open_for_undefined_action() {
        let services = services(deny_all());
        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);
        let record = Record::new(POST, 1);

        assert!(!resource.can_delete(&ctx(), &record));
        assert!(resource.can_restore(&ctx(), &record));
        assert!(resource.can_create(&ctx()));
    }

    #[test]
    fn test_ignore_policies_allows_everything() {
        let services = services(deny_all());
        let descriptor = posts().ignore_policies(true);
        let resource = Resource::new(&descriptor, &services);
        let record = Record::new(POST, 1);

        assert!(resource.can_view_any(&ctx()));
        assert!(resource.can_edit(&ctx(), &record));
        assert!(resource.authorize(&ctx(), Action::Delete, Some(&record)).is_ok());
    }

    #[test]
    fn test_policy_sees_user_and_record() {
        let gate = PolicyGate::new().policy(
            POST,
            Policy::new().define("update", |user, subject| match (user, subject) {
                (Some(user), Subject::Record(record)) => {
                    record.attribute_string("author_id").as_deref() == Some(user.id.as_str())
                }
                _ => false,
            }),
        );
        let services = services(gate);
        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);
        let record = Record::new(POST, 1).with_attribute("author_id", "9");

        let author = ctx().with_user(User::new("9", "Grace"));
        let other = ctx().with_user(User::new("3", "Linus"));
        assert!(resource.can_edit(&author, &record));
        assert!(!resource.can_edit(&other, &record));
        assert!(matches!(
            resource.authorize(&other, Action::Update, Some(&record)),
            Err(ResourceError::AccessDenied(_))
        ));
        // Checks are side-effect free.
        assert_eq!(resource.can_edit(&author, &record), resource.can_edit(&author, &record));
    }

    #[test]
    fn test_can_globally_search() {
        let services = services(PolicyGate::new());

        let descriptor = posts();
        assert!(Resource::new(&descriptor, &services).can_globally_search(&ctx()));

        let descriptor = ResourceDescriptor::new("PostResource");
        assert!(!Resource::new(&descriptor, &services).can_globally_search(&ctx()));

        let descriptor = posts().globally_searchable(false);
        assert!(!Resource::new(&descriptor, &services).can_globally_search(&ctx()));

        let services = self::services(deny_all());
        let descriptor = posts();
        assert!(!Resource::new(&descriptor, &services).can_globally_search(&ctx()));
    }

    #[test]
    fn test_get_url_passes_record_and_null_tenant() {
        let router = Arc::new(RecordingRouter::default());
        let services = services_with(PolicyGate::new(), Arc::new(MemoryStore::new("mysql")), router.clone());
        let descriptor = ResourceDescriptor::new(BLOG_POST_RESOURCE)
            .with_page("index", PageRegistration::index())
            .with_page("edit", PageRegistration::edit())
            .with_page("view", PageRegistration::view());
        let resource = Resource::new(&descriptor, &services);

        let url = resource
            .get_url(&ctx(), "edit", RouteParameters::new().with("record", 7))
            .unwrap();
        assert_eq!(url, "https://panel.test/filament.custom.resources.blog-posts.edit");

        let calls = router.calls.lock().unwrap();
        let (name, parameters, absolute) = &calls[0];
        assert_eq!(name, "filament.custom.resources.blog-posts.edit");
        assert_eq!(
            parameters,
            &RouteParameters::from([("record", json!(7)), ("tenant", Value::Null)])
        );
        assert!(absolute);
    }

    #[test]
    fn test_get_url_tenant_defaults() {
        let router = Arc::new(RecordingRouter::default());
        let services = services_with(PolicyGate::new(), Arc::new(MemoryStore::new("mysql")), router.clone());
        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);
        let acme = Record::new("app::models::Team", "acme");
        let globex = Record::new("app::models::Team", "globex");
        let ctx = ctx().with_routable_tenant(acme);

        resource.get_url(&ctx, "index", RouteParameters::new()).unwrap();
        resource
            .get_url_with(
                &ctx,
                UrlOptions {
                    tenant: Some(&globex),
                    absolute: false,
                    context: Some("admin"),
                    ..UrlOptions::default()
                },
            )
            .unwrap();

        let calls = router.calls.lock().unwrap();
        assert_eq!(calls[0].1.get("tenant"), Some(&json!("acme")));
        assert_eq!(calls[1].0, "filament.admin.resources.posts.index");
        assert_eq!(calls[1].1.get("tenant"), Some(&json!("globex")));
        assert!(!calls[1].2);
    }

    #[test]
    fn test_unknown_page_propagates_router_error() {
        let table = Arc::new(RouteTable::new("http://localhost"));
        let services = services_with(PolicyGate::new(), Arc::new(MemoryStore::new("mysql")), table);
        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);

        let result = resource.get_url(&ctx(), "missing", RouteParameters::new());
        assert!(matches!(
            result,
            Err(ResourceError::Routing(RoutingError::RouteNotFound(_)))
        ));
    }

    #[test]
    fn test_routes_register_pages_under_slug() {
        let table = Arc::new(RouteTable::new("http://localhost"));
        let services = services_with(PolicyGate::new(), Arc::new(MemoryStore::new("mysql")), table.clone());
        let descriptor = ResourceDescriptor::new("app::filament::resources::blog::PostResource")
            .with_crud_pages()
            .with_route_middleware(["authenticate"]);
        let resource = Resource::new(&descriptor, &services);

        resource.routes(table.as_ref()).unwrap();

        let edit = table.route("blog/posts.edit").unwrap();
        assert_eq!(edit.path, "/blog/posts/{record}/edit");
        assert_eq!(edit.middleware, vec!["authenticate"]);
        assert!(table.has("blog/posts.index"));
        assert!(table.has("blog/posts.create"));
        assert!(table.has("blog/posts.view"));
        assert!(resource.has_page("create"));
        assert!(!resource.has_page("export"));
    }

    #[test]
    fn test_eloquent_query_scopes_to_tenant() {
        let services = services(PolicyGate::new());
        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);
        let team = Record::new("app::models::Team", 3);

        assert!(resource.eloquent_query(&ctx()).clauses().is_empty());

        let (sql, bindings) = resource.eloquent_query(&ctx().with_tenant(team.clone())).where_sql();
        assert_eq!(sql, "team_id = ?");
        assert_eq!(bindings, vec![json!(3)]);

        let descriptor = posts().with_hooks(
            ResourceHooks::default().scope_to_tenant(|query, tenant| {
                query.where_("organization", crate::core::query::Operator::Eq, tenant.key.clone());
            }),
        );
        let resource = Resource::new(&descriptor, &services);
        let (sql, _) = resource.eloquent_query(&ctx().with_tenant(team)).where_sql();
        assert_eq!(sql, "organization = ?");
    }

    #[test]
    fn test_global_search_sql_for_two_words() {
        let services = services(PolicyGate::new());
        let descriptor = ResourceDescriptor::new("app::filament::resources::UserResource")
            .with_globally_searchable_attributes(["name", "email"]);
        let resource = Resource::new(&descriptor, &services);

        let query = resource.global_search_query(&ctx(), "alice bob").unwrap();
        let (sql, bindings) = query.where_sql();
        assert_eq!(
            sql,
            "(name like ? or email like ?) and (name like ? or email like ?)"
        );
        assert_eq!(
            bindings,
            vec![json!("%alice%"), json!("%alice%"), json!("%bob%"), json!("%bob%")]
        );
        assert_eq!(query.limit_value(), Some(50));
    }

    #[test]
    fn test_global_search_dotted_attribute() {
        let services = services(PolicyGate::new());
        let descriptor = posts().with_globally_searchable_attributes(["title", "author.name"]);
        let resource = Resource::new(&descriptor, &services);

        let query = resource.global_search_query(&ctx(), "joe").unwrap();
        assert_eq!(
            query.where_sql().0,
            "(title like ? or exists (select * from author where name like ?))"
        );
    }

    #[test]
    fn test_global_search_uses_narrowing_hook() {
        let services = services(PolicyGate::new());
        let descriptor = posts().with_hooks(ResourceHooks::default().global_search_query(|query, _| {
            query.where_("status", crate::core::query::Operator::Eq, "published");
        }));
        let resource = Resource::new(&descriptor, &services);

        let query = resource.global_search_query(&ctx(), "rust").unwrap();
        assert_eq!(query.where_sql().0, "status = ? and (title like ?)");
    }

    #[test]
    fn test_empty_search_returns_nothing() {
        let store = Arc::new(MemoryStore::new("mysql"));
        store.insert(Record::new(POST, 1).with_attribute("title", "Hello"));
        let services = services_with(PolicyGate::new(), store, Arc::new(RecordingRouter::default()));
        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);

        assert!(resource.global_search_query(&ctx(), "  \t ").is_none());
        assert!(resource.global_search_results(&ctx(), "").unwrap().is_empty());
        assert!(resource.global_search_results(&ctx(), "   ").unwrap().is_empty());
    }

    #[test]
    fn test_global_search_respects_limit() {
        let store = Arc::new(MemoryStore::new("sqlite"));
        for id in 0..10 {
            store.insert(Record::new(POST, id).with_attribute("title", format!("Post {id}")));
        }
        let services = services_with(PolicyGate::new(), store, Arc::new(RecordingRouter::default()));
        let descriptor = posts().with_global_search_results_limit(NonZeroUsize::new(3).unwrap());
        let resource = Resource::new(&descriptor, &services);

        let results = resource.global_search_results(&ctx(), "post").unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_global_search_drops_records_without_url() {
        let store = Arc::new(MemoryStore::new("sqlite"));
        store.insert(Record::new(POST, 1).with_attribute("title", "Mine").with_attribute("author_id", "1"));
        store.insert(Record::new(POST, 2).with_attribute("title", "Theirs").with_attribute("author_id", "2"));
        let gate = PolicyGate::new().policy(
            POST,
            Policy::new()
                .define("update", |_, _| false)
                .define("view", |user, subject| match (user, subject) {
                    (Some(user), Subject::Record(record)) => {
                        record.attribute_string("author_id").as_deref() == Some(user.id.as_str())
                    }
                    _ => false,
                }),
        );
        let router = Arc::new(RecordingRouter::default());
        let services = services_with(gate, store, router.clone());
        let descriptor = posts().with_hooks(
            ResourceHooks::default()
                .global_search_result_details(|record| {
                    IndexMap::from([(
                        "Author".to_string(),
                        record.attribute_string("author_id").unwrap_or_default(),
                    )])
                })
                .global_search_result_actions(|_| vec![GlobalSearchResultAction::new("open", "Open")]),
        );
        let resource = Resource::new(&descriptor, &services);
        let ctx = ctx().with_user(User::new("1", "Ada"));

        let results = resource.global_search_results(&ctx, "").unwrap();
        assert!(results.is_empty());

        let results = resource.global_search_results(&ctx, "i").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Mine");
        assert_eq!(results[0].url, "https://panel.test/filament.custom.resources.posts.view");
        assert_eq!(results[0].details["Author"], "1");
        assert_eq!(results[0].actions[0].name, "open");

        let calls = router.calls.lock().unwrap();
        assert_eq!(calls[0].1.get("record"), Some(&json!("1")));
    }

    #[test]
    fn test_result_url_prefers_edit() {
        let services = services(PolicyGate::new());
        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);
        let record = Record::new(POST, 5);

        let url = resource.global_search_result_url(&ctx(), &record).unwrap();
        assert_eq!(url.as_deref(), Some("https://panel.test/filament.custom.resources.posts.edit"));

        let descriptor = ResourceDescriptor::new("PostResource").with_page("index", PageRegistration::index());
        let resource = Resource::new(&descriptor, &services);
        assert_eq!(resource.global_search_result_url(&ctx(), &record).unwrap(), None);
    }

    #[test]
    fn test_resolve_record_route_binding() {
        let store = Arc::new(MemoryStore::new("sqlite"));
        store.insert(Record::new(POST, 1).with_attribute("slug", "hello").with_attribute("team_id", 1));
        store.insert(Record::new(POST, 2).with_attribute("slug", "rust").with_attribute("team_id", 2));
        let services = services_with(PolicyGate::new(), store, Arc::new(RecordingRouter::default()));

        let descriptor = posts();
        let resource = Resource::new(&descriptor, &services);
        let found = resource.resolve_record_route_binding(&ctx(), "2").unwrap();
        assert_eq!(found.map(|r| r.key), Some(json!(2)));

        let descriptor = posts().with_record_route_key_name("slug");
        let resource = Resource::new(&descriptor, &services);
        let team = Record::new("app::models::Team", 1);
        assert!(
            resource
                .resolve_record_route_binding(&ctx().with_tenant(team.clone()), "hello")
                .unwrap()
                .is_some()
        );
        assert!(
            resource
                .resolve_record_route_binding(&ctx().with_tenant(team), "rust")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_global_search_urls_escape_route_keys() {
        let store = Arc::new(MemoryStore::new("sqlite"));
        store.insert(Record::new(POST, 1).with_attribute("title", "Rust in 2024").with_attribute("slug", "2024/rust"));
        store.insert(Record::new(POST, 2).with_attribute("title", "Rust A").with_attribute("slug", "rust-a"));
        let table = Arc::new(RouteTable::new("http://localhost"));
        let services = services_with(PolicyGate::new(), store, table.clone());
        let descriptor = posts().with_record_route_key_name("slug");
        let resource = Resource::new(&descriptor, &services);

        table
            .register_route_group(RouteGroup::new("filament.custom.resources.", ""), &mut |router| {
                resource.routes(router)
            })
            .unwrap();

        let results = resource.global_search_results(&ctx(), "rust").unwrap();
        let urls: Vec<&str> = results.iter().map(|result| result.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "http://localhost/posts/2024%2Frust/edit",
                "http://localhost/posts/rust-a/edit"
            ]
        );

        let route = table.route("filament.custom.resources.posts.edit").unwrap();
        let parameters = route.extract_parameters("/posts/2024%2Frust/edit").unwrap();
        let record = resource
            .resolve_record_route_binding(&ctx(), &parameters["record"])
            .unwrap();
        assert_eq!(record.map(|r| r.key), Some(json!(1)));
    }

    #[test]
    fn test_global_search_translatable_attribute() {
        const CATEGORY: &str = "app::models::Category";

        for (driver, expected) in [
            ("sqlite", "(lower(json_extract(name, '$')) like lower(?))"),
            ("pgsql", "(lower(name::text) ilike lower(?))"),
        ] {
            let store = Arc::new(MemoryStore::new(driver).with_translatable(CATEGORY, ["name"]));
            store.insert(
                Record::new(CATEGORY, 1).with_attribute("name", json!({"en": "Releases", "fr": "Versions"})),
            );
            store.insert(Record::new(CATEGORY, 2).with_attribute("name", json!({"en": "Guides"})));
            let router = Arc::new(RecordingRouter::default());
            let services = services_with(PolicyGate::new(), store, router.clone());
            let descriptor = ResourceDescriptor::new("app::filament::resources::CategoryResource")
                .with_record_title_attribute("name")
                .with_page("edit", PageRegistration::edit());
            let resource = Resource::new(&descriptor, &services);

            let query = resource.global_search_query(&ctx(), "Versions").unwrap();
            let (sql, bindings) = query.where_sql();
            assert_eq!(sql, expected);
            assert_eq!(bindings, vec![json!("%Versions%")]);

            let results = resource.global_search_results(&ctx(), "versions").unwrap();
            assert_eq!(results.len(), 1);
            assert_eq!(
                results[0].url,
                "https://panel.test/filament.custom.resources.categories.edit"
            );
            let calls = router.calls.lock().unwrap();
            assert_eq!(calls[0].1.get("record"), Some(&json!("1")));
        }
    }

    #[test]
    fn test_navigation_items() {
        let services = services(PolicyGate::new());
        let descriptor = posts()
            .with_navigation_group("Blog")
            .with_navigation_sort(2)
            .with_hooks(ResourceHooks::default().navigation_badge(|_| Some("4".to_string())));
        let resource = Resource::new(&descriptor, &services);

        let items = resource.register_navigation_items(&ctx()).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.label, "Posts");
        assert_eq!(item.group.as_deref(), Some("Blog"));
        assert_eq!(item.icon, DEFAULT_NAVIGATION_ICON);
        assert_eq!(item.active_icon, DEFAULT_NAVIGATION_ICON);
        assert_eq!(item.badge.as_deref(), Some("4"));
        assert_eq!(item.badge_color, None);
        assert!(item.is_active("filament.custom.resources.posts.edit"));
        assert_eq!(item.url, "https://panel.test/filament.custom.resources.posts.index");
    }

    #[test]
    fn test_navigation_hidden_without_view_any() {
        let services = services(deny_all());
        let descriptor = posts();
        assert!(
            Resource::new(&descriptor, &services)
                .register_navigation_items(&ctx())
                .unwrap()
                .is_empty()
        );

        let services = self::services(PolicyGate::new());
        let descriptor = posts().should_register_navigation(false);
        assert!(
            Resource::new(&descriptor, &services)
                .register_navigation_items(&ctx())
                .unwrap()
                .is_empty()
        );
    }
}
