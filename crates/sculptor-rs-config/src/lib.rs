//! Configuration models and layered config loading.
//!
//! This crate owns the Sculptor config schema, validation, layer merging and
//! environment overrides used by the server and CLI.

mod env;
mod error;
mod loader;
mod model;

/// Environment override support.
pub use env::ENV_PREFIX;
/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
