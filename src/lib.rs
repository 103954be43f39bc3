//! Filament Panel Library
//!
//! Declarative admin-panel resources. A resource describes how one data
//! model is administered; from that description the crate derives labels,
//! slugs, route names and URLs, authorization checks, tenant-scoped queries,
//! navigation entries and global search. Panels mount resources under a URL
//! prefix behind middleware.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, request contexts, the query
//!   layer, the route table and the HTTP server
//! - **domains**: business logic organized by bounded contexts
//!   - **resources**: resource descriptors and the operations derived from them
//!   - **panels**: panel providers, the panel registry and the booted runtime
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use filament_panel::core::{Config, HttpServer};
//! use filament_panel::domains::panels::{
//!     PanelRegistry, PanelRuntime, demo_store, demo_users, get_all_panel_providers,
//! };
//! use filament_panel::domains::resources::{NamingStrategy, get_all_policies};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let registry = PanelRegistry::from_providers(&get_all_panel_providers())?;
//!     let gate = get_all_policies(&NamingStrategy::new());
//!     let runtime = PanelRuntime::boot(
//!         registry,
//!         Arc::new(gate),
//!         Arc::new(demo_store("sqlite")),
//!         demo_users(),
//!         &config,
//!     )?;
//!     HttpServer::new(config, runtime).run().await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, Result};
#[cfg(feature = "http")]
pub use core::HttpServer;
