//! Domain modules organized by bounded contexts.
//!
//! - **resources**: declarative resource descriptors and the operations derived from them
//! - **panels**: panels mounting resources, their registry and runtime

pub mod panels;
pub mod resources;
