//! Blog category resource definition.

use super::ResourceDefinition;
use crate::domains::resources::descriptor::{ResourceDescriptor, ResourceHooks};
use crate::domains::resources::pages::PageRegistration;

/// Blog categories. Names are stored per locale; there is no policy, so
/// every action is allowed.
pub struct CategoryResource;

impl ResourceDefinition for CategoryResource {
    const TYPE_NAME: &'static str = "app::filament::resources::blog::CategoryResource";

    fn descriptor() -> ResourceDescriptor {
        ResourceDescriptor::new(Self::TYPE_NAME)
            .with_record_title_attribute("name")
            .with_navigation_group("Blog")
            .with_navigation_icon("heroicon-o-tag")
            .with_navigation_sort(2)
            .with_page("index", PageRegistration::index())
            .with_page("edit", PageRegistration::edit())
            .with_hooks(ResourceHooks::default().global_search_result_title(|record| {
                record
                    .attribute("name")
                    .and_then(|name| name.get("en").or(Some(name)))
                    .and_then(crate::core::query::value_to_string)
                    .unwrap_or_default()
            }))
    }
}
