//! Configuration module for the moekit build
//!
//! Provides types and parsing for `moe.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::{default_config, find_config, load_config, ConfigError};
pub use schema::*;
