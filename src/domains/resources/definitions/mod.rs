//! Resource definitions module.
//!
//! Each resource is defined in its own file with:
//! - its declared type path
//! - a descriptor (labels, pages, search, navigation)
//! - an optional policy for its model
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `invoice.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod category;
mod post;
mod user;

pub use category::CategoryResource;
pub use post::PostResource;
pub use user::UserResource;

use super::authorization::Policy;
use super::descriptor::ResourceDescriptor;

/// Trait for resource definitions.
pub trait ResourceDefinition {
    /// Declared path of the resource type. Model, slug and labels are
    /// derived from it unless the descriptor overrides them.
    const TYPE_NAME: &'static str;

    /// Build the descriptor.
    fn descriptor() -> ResourceDescriptor;

    /// Policy guarding the resource's model. `None` leaves every action
    /// allowed.
    fn policy() -> Option<Policy> {
        None
    }
}
