//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()` and `get_all_policies()`

use super::authorization::PolicyGate;
use super::definitions::{CategoryResource, PostResource, ResourceDefinition, UserResource};
use super::descriptor::ResourceDescriptor;
use super::naming::NamingStrategy;

/// Register the policy of `R`, keyed by the model the resource manages.
fn with_policy<R: ResourceDefinition>(gate: PolicyGate, naming: &NamingStrategy) -> PolicyGate {
    let Some(policy) = R::policy() else {
        return gate;
    };

    let model = R::descriptor()
        .model
        .unwrap_or_else(|| naming.model_identifier(R::TYPE_NAME));
    gate.policy(model, policy)
}

/// Descriptors of every registered resource.
///
/// This is the central place where all resources are registered.
pub fn get_all_resources() -> Vec<ResourceDescriptor> {
    vec![
        PostResource::descriptor(),
        CategoryResource::descriptor(),
        UserResource::descriptor(),
    ]
}

/// Gate holding the policies of every registered resource.
pub fn get_all_policies(naming: &NamingStrategy) -> PolicyGate {
    let gate = PolicyGate::new();
    let gate = with_policy::<PostResource>(gate, naming);
    let gate = with_policy::<CategoryResource>(gate, naming);
    with_policy::<UserResource>(gate, naming)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::authorization::AuthorizationGate;

    #[test]
    fn test_get_all_resources() {
        let resources = get_all_resources();
        assert_eq!(resources.len(), 3);

        let naming = NamingStrategy::new();
        let slugs: Vec<_> = resources.iter().map(|r| naming.slug(&r.type_name)).collect();
        assert_eq!(slugs, vec!["blog/posts", "blog/categories", "users"]);
    }

    #[test]
    fn test_get_all_policies() {
        let gate = get_all_policies(&NamingStrategy::new());
        assert!(gate.policy_for("app::models::Post").is_some());
        assert!(gate.policy_for("app::models::User").is_some());
        assert!(gate.policy_for("app::models::Category").is_none());
    }
}
