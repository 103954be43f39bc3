//! Panels domain module.
//!
//! A panel is a mounted admin area: an id, a URL prefix, middleware, pages
//! and resources. Providers configure panels; the runtime boots them.
//!
//! ## Architecture
//!
//! - `panel.rs` - The `Panel` builder, route registration, navigation and search
//! - `registry.rs` - `PanelProvider` trait and `PanelRegistry`
//! - `runtime.rs` - Booted panels and request contexts
//! - `demo.rs` - Seed data for the bundled panels
//! - `definitions/` - Individual panel providers (one file per panel)

pub mod definitions;
mod demo;
mod error;
mod panel;
mod registry;
mod runtime;

pub use definitions::{AdminPanelProvider, CustomPanelProvider};
pub use demo::{demo_store, demo_users};
pub use error::PanelError;
pub use panel::{GLOBAL_SEARCH_ROUTE, LOGIN_ROUTE, Panel};
pub use registry::{PanelProvider, PanelRegistry, get_all_panel_providers};
pub use runtime::{PanelRuntime, UserDirectory};
