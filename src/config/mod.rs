//! Configuration model for lockcron.
//!
//! This module defines the Config struct that represents `lockcron.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

pub use model::Config;
pub use types::DEFAULT_CONFIG_FILE;
