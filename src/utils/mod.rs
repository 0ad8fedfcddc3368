//! Configuration utilities.

/// TOML configuration (`jobly.toml`).
pub mod toml_config;
