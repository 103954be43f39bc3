//! HTTP surface.
//!
//! Mounts the booted route table on axum. Middleware identifiers carried by
//! each route are resolved through a [`MiddlewareRegistry`] when the router
//! is built.

mod error;
mod middleware;
mod server;

pub use error::ApiError;
pub use middleware::{ApplyMiddleware, Identity, MiddlewareRegistry, PANEL_HEADER, ServingPanel};
pub use server::{AppState, HttpServer};
