//! Resources domain module.
//!
//! A resource maps a data model to CRUD pages, navigation entries,
//! authorization checks and global search.
//!
//! ## Architecture
//!
//! - `descriptor.rs` - Declarative configuration (`ResourceDescriptor`, hooks)
//! - `resource.rs` - Resolution of a descriptor against the panel services
//! - `naming.rs` - Model, slug and label conventions
//! - `authorization.rs` - Policies and the authorization gate
//! - `search.rs` - Global search constraints and results
//! - `navigation.rs` - Navigation items
//! - `pages.rs` - Page registrations
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `registry.rs` - Central resource registration
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `invoice.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod authorization;
pub mod definitions;
pub mod descriptor;
mod error;
pub mod naming;
pub mod navigation;
pub mod pages;
mod registry;
mod resource;
pub mod search;

pub use authorization::{Action, AuthorizationGate, Policy, PolicyGate, Subject};
pub use definitions::ResourceDefinition;
pub use descriptor::{ResourceDescriptor, ResourceHooks};
pub use error::ResourceError;
pub use naming::NamingStrategy;
pub use navigation::{NavigationGroup, NavigationItem};
pub use pages::PageRegistration;
pub use registry::{get_all_policies, get_all_resources};
pub use resource::{Resource, ResourceServices, UrlOptions};
pub use search::{GlobalSearchResult, GlobalSearchResultAction, GlobalSearchResultGroup};
