//! Public SDK surface for Sculptor.
//!
//! This crate re-exports the building blocks and provides the config and
//! logging helpers shared by the `sculptor` binary.

/// Re-export for convenience.
pub use sculptor_rs_config as config;
/// Re-export for convenience.
pub use sculptor_rs_core as core;
/// Re-export for convenience.
pub use sculptor_rs_memory as memory;
/// Re-export for convenience.
pub use sculptor_rs_server as server;

use anyhow::Context;
use log::{debug, info};
use sculptor_rs_config::{LayeredConfigOptions, SculptorConfig};
use std::path::{Path, PathBuf};

/// Initialize `env_logger` with millisecond timestamps; `RUST_LOG` applies.
///
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}

/// Load the layered config for `cwd`, then apply environment overrides.
pub fn load_config(cwd: &Path, runtime_paths: &[PathBuf]) -> anyhow::Result<SculptorConfig> {
    let options = runtime_paths
        .iter()
        .fold(LayeredConfigOptions::new(cwd), |options, path| {
            options.with_runtime_path(path)
        });
    load_config_with(options, |name| std::env::var(name).ok())
}

/// Like [`load_config`] with explicit layer options and environment lookup.
pub fn load_config_with<F>(
    options: LayeredConfigOptions,
    lookup: F,
) -> anyhow::Result<SculptorConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let layered = SculptorConfig::load_layered_with_options(options)
        .context("failed to load configuration")?;
    for layer in &layered.layers {
        debug!("config layer (source={:?}, path={})", layer.source, layer.path.display());
    }
    let mut config = layered.config;
    let applied = config
        .apply_env_with(lookup)
        .context("invalid environment override")?;
    if !applied.is_empty() {
        info!("environment overrides: {}", applied.join(", "));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::load_config_with;
    use pretty_assertions::assert_eq;
    use sculptor_rs_config::LayeredConfigOptions;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn env_overrides_win_over_files() {
        let temp = tempdir().expect("tempdir");
        fs::write(
            temp.path().join("sculptor.json5"),
            "{ completion: { model: \"file-model\" }, server: { port: 9000 } }",
        )
        .expect("write");
        let mut options = LayeredConfigOptions::new(temp.path());
        options.user_config_path = None;

        let config = load_config_with(options, |name| {
            (name == "SCULPTOR_COMPLETION_MODEL").then(|| "env-model".to_string())
        })
        .expect("config");

        assert_eq!(config.completion.model, "env-model");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn invalid_layer_is_reported_with_context() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("sculptor.json5"), "{ bogus: 1 }").expect("write");
        let mut options = LayeredConfigOptions::new(temp.path());
        options.user_config_path = None;

        let err = load_config_with(options, |_| None).unwrap_err();
        assert_eq!(err.to_string(), "failed to load configuration");
        assert!(format!("{err:#}").contains("unknown key"));
    }
}
