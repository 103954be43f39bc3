//! Panel provider definitions.
//!
//! Each panel is configured by its own provider.
//!
//! ## Adding a New Panel
//!
//! 1. Create a new file (e.g., `billing.rs`)
//! 2. Implement the `PanelProvider` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod admin;
mod custom;

pub use admin::AdminPanelProvider;
pub use custom::CustomPanelProvider;
