//! User resource definition.

use super::ResourceDefinition;
use crate::core::context::User;
use crate::domains::resources::authorization::{Action, Policy, Subject};
use crate::domains::resources::descriptor::ResourceDescriptor;

/// Panel users. Only admins may list or manage them.
pub struct UserResource;

impl ResourceDefinition for UserResource {
    const TYPE_NAME: &'static str = "app::filament::resources::UserResource";

    fn descriptor() -> ResourceDescriptor {
        ResourceDescriptor::new(Self::TYPE_NAME)
            .with_record_title_attribute("name")
            .with_globally_searchable_attributes(["name", "email"])
            .with_navigation_icon("heroicon-o-users")
            .with_crud_pages()
    }

    fn policy() -> Option<Policy> {
        Some(
            Policy::new()
                .define(Action::ViewAny.as_str(), admin)
                .define(Action::View.as_str(), admin)
                .define(Action::Create.as_str(), admin)
                .define(Action::Update.as_str(), admin)
                .define(Action::Delete.as_str(), admin),
        )
    }
}

fn admin(user: Option<&User>, _: Subject<'_>) -> bool {
    user.is_some_and(|user| user.has_role("admin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_admins_manage_users() {
        let policy = UserResource::policy().unwrap();
        let view_any = policy.handler("view_any").unwrap();
        let admin = User::new("1", "Ada").with_role("admin");
        let editor = User::new("2", "Grace").with_role("editor");

        assert!(view_any(Some(&admin), Subject::Model("app::models::User")));
        assert!(!view_any(Some(&editor), Subject::Model("app::models::User")));
        assert!(!view_any(None, Subject::Model("app::models::User")));
    }
}
