//! Configuration module for craftgrid
//!
//! Provides types and loading for `craft.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
