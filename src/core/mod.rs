//! Core module containing shared infrastructure components.
//!
//! This module provides the building blocks the panels are made of:
//! configuration, error handling, request contexts, the query layer, the
//! route table and, with the `http` feature, the HTTP server.

pub mod config;
pub mod context;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod query;
pub mod routing;

#[cfg(feature = "http")]
pub mod http;

pub use config::Config;
pub use context::{RequestContext, User};
pub use error::{Error, Result};
#[cfg(feature = "http")]
pub use http::HttpServer;
