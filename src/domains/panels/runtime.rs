//! Booted panels.
//!
//! [`PanelRuntime::boot`] registers every panel's routes into one
//! [`RouteTable`] and freezes the result. Afterwards the runtime is shared
//! read-only across requests and builds a [`RequestContext`] for each.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::PanelError;
use super::panel::Panel;
use super::registry::PanelRegistry;
use crate::core::config::Config;
use crate::core::context::{RequestContext, User};
use crate::core::query::{Operator, QueryProvider};
use crate::core::routing::RouteTable;
use crate::domains::resources::{AuthorizationGate, NamingStrategy, Resource, ResourceServices};

/// Users known to the panels, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id.clone(), user);
        self
    }

    pub fn find(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }
}

/// Panels with their routes registered, plus the services they share.
#[derive(Debug)]
pub struct PanelRuntime {
    registry: PanelRegistry,
    services: ResourceServices,
    routes: Arc<RouteTable>,
    users: UserDirectory,
    locale: String,
}

impl PanelRuntime {
    /// Register the routes of every panel in `registry`.
    pub fn boot(
        registry: PanelRegistry,
        gate: Arc<dyn AuthorizationGate>,
        queries: Arc<dyn QueryProvider>,
        users: UserDirectory,
        config: &Config,
    ) -> Result<Self, PanelError> {
        let routes = Arc::new(RouteTable::new(config.http.base_url()));
        let naming = NamingStrategy::new().with_model_namespace(config.panel.model_namespace.clone());
        let services = ResourceServices::new(gate, queries, routes.clone()).with_naming(naming);

        for panel in registry.panels() {
            panel.register_routes(&services)?;
        }

        info!(
            "Booted {} panels with {} routes",
            registry.len(),
            routes.routes().len()
        );

        Ok(Self {
            registry,
            services,
            routes,
            users,
            locale: config.panel.locale.clone(),
        })
    }

    pub fn services(&self) -> &ResourceServices {
        &self.services
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn panel(&self, id: &str) -> Result<&Panel, PanelError> {
        self.registry
            .get(id)
            .ok_or_else(|| PanelError::UnknownPanel(id.to_string()))
    }

    /// The resource of panel `panel_id` served under `slug`.
    pub fn resource(&self, panel_id: &str, slug: &str) -> Option<Resource<'_>> {
        self.registry.get(panel_id)?.resource(&self.services, slug)
    }

    /// Look up a user by id.
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.find(id)
    }

    /// Context for a request to `panel_id`.
    ///
    /// Unknown user ids are treated as guests. `tenant_key` is required to
    /// exist when the panel has tenancy and ignored otherwise.
    pub fn context(
        &self,
        panel_id: &str,
        user_id: Option<&str>,
        tenant_key: Option<&str>,
    ) -> Result<RequestContext, PanelError> {
        let panel = self.panel(panel_id)?;
        let mut ctx = RequestContext::new(panel_id).with_locale(self.locale.clone());

        if let Some(id) = user_id {
            match self.users.find(id) {
                Some(user) => ctx = ctx.with_user(user.clone()),
                None => warn!("Unknown user '{}' treated as guest", id),
            }
        }

        if let (Some(model), Some(key)) = (panel.tenant_model(), tenant_key) {
            let mut query = self.services.queries.query(model);
            query.where_("id", Operator::Eq, key);
            let tenant = self
                .services
                .queries
                .first(&query)?
                .ok_or_else(|| PanelError::tenant_not_found(panel_id, key))?;
            ctx = ctx.with_tenant(tenant.clone()).with_routable_tenant(tenant);
        }

        Ok(ctx)
    }
}
