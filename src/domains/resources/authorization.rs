//! Policies and the authorization gate.
//!
//! A [`Policy`] is a set of named, optionally present handlers. An action
//! missing from the set is "not defined"; what that means is decided by the
//! caller (resources treat it as allowed).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::context::User;
use crate::core::query::Record;

/// Fixed action names checked by resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// List records.
    ViewAny,
    /// View one record.
    View,
    /// Create a record.
    Create,
    /// Edit a record.
    Update,
    /// Delete a record.
    Delete,
    /// Bulk delete.
    DeleteAny,
    /// Permanently delete a record.
    ForceDelete,
    /// Bulk permanent delete.
    ForceDeleteAny,
    /// Reorder records.
    Reorder,
    /// Duplicate a record.
    Replicate,
    /// Restore a soft-deleted record.
    Restore,
    /// Bulk restore.
    RestoreAny,
}

impl Action {
    /// Name used to look up the policy handler.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewAny => "view_any",
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::DeleteAny => "delete_any",
            Self::ForceDelete => "force_delete",
            Self::ForceDeleteAny => "force_delete_any",
            Self::Reorder => "reorder",
            Self::Replicate => "replicate",
            Self::Restore => "restore",
            Self::RestoreAny => "restore_any",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an ability is checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Subject<'a> {
    /// The model type as a whole (e.g. "create any post").
    Model(&'a str),
    /// A specific record.
    Record(&'a Record),
}

impl Subject<'_> {
    /// Model identifier of the subject.
    pub fn model(&self) -> &str {
        match self {
            Self::Model(model) => *model,
            Self::Record(record) => record.model.as_str(),
        }
    }
}

/// Handler deciding a single ability.
pub type PolicyHandler = Arc<dyn Fn(Option<&User>, Subject<'_>) -> bool + Send + Sync>;

/// Abilities defined for one model.
#[derive(Clone, Default)]
pub struct Policy {
    handlers: HashMap<String, PolicyHandler>,
}

impl Policy {
    /// Create a policy that defines no abilities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the handler for `action`.
    pub fn define<F>(mut self, action: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Option<&User>, Subject<'_>) -> bool + Send + Sync + 'static,
    {
        self.handlers.insert(action.into(), Arc::new(handler));
        self
    }

    /// Whether the policy defines `action`.
    pub fn has(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Handler for `action`.
    pub fn handler(&self, action: &str) -> Option<&PolicyHandler> {
        self.handlers.get(action)
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.handlers.keys().collect();
        actions.sort();
        f.debug_struct("Policy").field("actions", &actions).finish()
    }
}

/// Resolves policies and checks abilities.
pub trait AuthorizationGate: Send + Sync {
    /// Policy registered for `model`, if any.
    fn policy_for(&self, model: &str) -> Option<&Policy>;

    /// Check `action` for `user` against `subject`.
    fn check(&self, user: Option<&User>, action: &str, subject: Subject<'_>) -> bool;
}

/// Gate backed by a model → policy map. Undefined abilities are denied.
#[derive(Debug, Clone, Default)]
pub struct PolicyGate {
    policies: HashMap<String, Policy>,
}

impl PolicyGate {
    /// Create a gate with no policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the policy for `model`.
    pub fn policy(mut self, model: impl Into<String>, policy: Policy) -> Self {
        self.policies.insert(model.into(), policy);
        self
    }
}

impl AuthorizationGate for PolicyGate {
    fn policy_for(&self, model: &str) -> Option<&Policy> {
        self.policies.get(model)
    }

    fn check(&self, user: Option<&User>, action: &str, subject: Subject<'_>) -> bool {
        self.policy_for(subject.model())
            .and_then(|policy| policy.handler(action))
            .is_some_and(|handler| handler(user, subject))
    }
}
