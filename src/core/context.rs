//! Per-request context.
//!
//! Everything that depends on the current request (panel, user, tenant,
//! locale) travels in a [`RequestContext`] passed explicitly to resource
//! operations. Nothing here is cached across requests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::query::Record;

/// An authenticated panel user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Role names used by policies.
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl User {
    /// Create a user without roles.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            roles: BTreeSet::new(),
        }
    }

    /// Grant a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Whether the user has `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// The ambient state of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    context_id: String,
    user: Option<User>,
    tenant: Option<Record>,
    routable_tenant: Option<Record>,
    locale: String,
}

impl RequestContext {
    /// Context for panel `context_id` with a guest user and locale `en`.
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            user: None,
            tenant: None,
            routable_tenant: None,
            locale: "en".to_string(),
        }
    }

    /// Set the authenticated user.
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the current tenant (scopes queries).
    pub fn with_tenant(mut self, tenant: Record) -> Self {
        self.tenant = Some(tenant);
        self
    }

    /// Set the tenant that appears in generated URLs.
    pub fn with_routable_tenant(mut self, tenant: Record) -> Self {
        self.routable_tenant = Some(tenant);
        self
    }

    /// Set the active locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Identifier of the active panel.
    pub fn current_context_id(&self) -> &str {
        &self.context_id
    }

    /// The authenticated user, if any.
    pub fn authenticated_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Tenant used to scope queries.
    pub fn current_tenant(&self) -> Option<&Record> {
        self.tenant.as_ref()
    }

    /// Tenant used as the `{tenant}` URL parameter.
    pub fn routable_tenant(&self) -> Option<&Record> {
        self.routable_tenant.as_ref()
    }

    /// Active locale (e.g. `en`, `pt_BR`).
    pub fn locale(&self) -> &str {
        &self.locale
    }
}
