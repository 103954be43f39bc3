//! Blog post resource definition.

use indexmap::IndexMap;

use super::ResourceDefinition;
use crate::core::context::User;
use crate::core::query::Record;
use crate::domains::resources::authorization::{Action, Policy, Subject};
use crate::domains::resources::descriptor::{ResourceDescriptor, ResourceHooks};
use crate::domains::resources::search::GlobalSearchResultAction;

/// Blog posts, searchable by title and author name.
pub struct PostResource;

impl ResourceDefinition for PostResource {
    const TYPE_NAME: &'static str = "app::filament::resources::blog::PostResource";

    fn descriptor() -> ResourceDescriptor {
        ResourceDescriptor::new(Self::TYPE_NAME)
            .with_record_title_attribute("title")
            .with_globally_searchable_attributes(["title", "author.name"])
            .with_navigation_group("Blog")
            .with_navigation_icon("heroicon-o-document-text")
            .with_navigation_sort(1)
            .with_crud_pages()
            .with_hooks(
                ResourceHooks::default()
                    .global_search_result_details(|record| {
                        let mut details = IndexMap::new();
                        if let Some(author) = record
                            .related("author")
                            .first()
                            .and_then(|author| author.attribute_string("name"))
                        {
                            details.insert("Author".to_string(), author);
                        }
                        if let Some(status) = record.attribute_string("status") {
                            details.insert("Status".to_string(), status);
                        }
                        details
                    })
                    .global_search_result_actions(|record| {
                        match record.attribute_string("status").as_deref() {
                            Some("draft") => vec![GlobalSearchResultAction::new("publish", "Publish")],
                            _ => Vec::new(),
                        }
                    }),
            )
    }

    fn policy() -> Option<Policy> {
        Some(
            Policy::new()
                .define(Action::ViewAny.as_str(), |user, _| user.is_some())
                .define(Action::View.as_str(), |user, _| user.is_some())
                .define(Action::Create.as_str(), |user, _| user.is_some())
                .define(Action::Update.as_str(), |user, subject| {
                    is_admin(user) || is_author(user, subject)
                })
                .define(Action::Delete.as_str(), |user, _| is_admin(user)),
        )
    }
}

fn is_admin(user: Option<&User>) -> bool {
    user.is_some_and(|user| user.has_role("admin"))
}

fn is_author(user: Option<&User>, subject: Subject<'_>) -> bool {
    let (Some(user), Subject::Record(record)) = (user, subject) else {
        return false;
    };
    author_id(record).as_deref() == Some(user.id.as_str())
}

fn author_id(record: &Record) -> Option<String> {
    record.attribute_string("author_id")
}
