//! Layered configuration loader.
//!
//! Layers are read in precedence order (user, working directory, runtime
//! overrides), each schema-checked on its own, deep-merged, and finally
//! decoded and validated as one `SculptorConfig`.

mod layer_io;
mod merge;
mod schema;


use crate::{APP_ID_PLACEHOLDER, ConfigError, SculptorConfig};
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name looked up in the user and working directories.
const DEFAULT_CONFIG_FILE: &str = "sculptor.json5";
/// Directory under the home directory holding the user layer.
const DEFAULT_CONFIG_DIR: &str = ".sculptor";

/// Merged config together with the layers it came from.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub config: SculptorConfig,
    /// Contributing layers, lowest precedence first.
    pub layers: Vec<ConfigLayer>,
}

/// Where a layer was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// `~/.sculptor/sculptor.json5`.
    User,
    /// `sculptor.json5` in the working directory.
    Cwd,
    /// Paths passed explicitly; applied last.
    Runtime,
}

/// A layer that contributed to the effective config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    pub source: ConfigLayerSource,
    pub path: PathBuf,
}

/// Layer locations to search.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Directory searched for `sculptor.json5`.
    pub cwd: PathBuf,
    /// User layer; `None` skips it.
    pub user_config_path: Option<PathBuf>,
    /// Explicit override files; each must exist.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    /// Search `cwd` and the home directory, with no runtime overrides.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
        }
    }

    /// Append an override file with the highest precedence so far.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Candidate layers in ascending precedence, with whether each is required.
    fn candidates(self) -> Vec<(ConfigLayerSource, PathBuf, bool)> {
        let user = self
            .user_config_path
            .map(|path| (ConfigLayerSource::User, path, false));
        let cwd = (ConfigLayerSource::Cwd, self.cwd.join(DEFAULT_CONFIG_FILE), false);
        let runtime = self
            .runtime_paths
            .into_iter()
            .map(|path| (ConfigLayerSource::Runtime, path, true));
        user.into_iter()
            .chain(std::iter::once(cwd))
            .chain(runtime)
            .collect()
    }
}

impl SculptorConfig {
    /// Parse JSON5 text as a complete config.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Discover and merge layers from explicit locations.
    ///
    /// Missing user and cwd files are skipped; a missing runtime file is an
    /// error. A file reached through two candidates is read once.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut merged = Value::Object(Map::new());
        let mut layers = Vec::new();
        let mut visited = HashSet::new();

        for (source, path, required) in options.candidates() {
            if !required && !path.exists() {
                continue;
            }
            let key = path.canonicalize().unwrap_or_else(|_| path.clone());
            if !visited.insert(key) {
                debug!("config layer already applied (path={})", path.display());
                continue;
            }
            merge::merge_json_values(&mut merged, layer_io::load_layer(source, &path)?);
            layers.push(ConfigLayer { source, path });
        }

        let config = config_from_value(merged, "effective")?;
        info!(
            "configuration resolved (layers=[{}])",
            layers
                .iter()
                .map(|layer| layer.source.label())
                .collect::<Vec<_>>()
                .join(",")
        );
        Ok(LayeredConfig { config, layers })
    }

    /// Check cross-field rules that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let completion = &self.completion;
        let generation = &self.generation;
        let checks = [
            (
                "completion.base_url",
                !completion.base_url.trim().is_empty(),
                "must not be empty",
            ),
            (
                "completion.model",
                !completion.model.trim().is_empty(),
                "must not be empty",
            ),
            (
                "completion.temperature",
                (0.0..=2.0).contains(&completion.temperature),
                "must be within 0.0..=2.0",
            ),
            (
                "completion.top_p",
                completion.top_p > 0.0 && completion.top_p <= 1.0,
                "must be within (0.0, 1.0]",
            ),
            (
                "generation.base_url_template",
                generation.base_url_template.contains(APP_ID_PLACEHOLDER),
                "must contain the {app_id} placeholder",
            ),
            (
                "generation.text_to_image_app",
                !generation.text_to_image_app.trim().is_empty(),
                "must not be empty",
            ),
            (
                "generation.image_to_3d_app",
                !generation.image_to_3d_app.trim().is_empty(),
                "must not be empty",
            ),
            (
                "generation.default_user",
                !generation.default_user.trim().is_empty(),
                "must not be empty",
            ),
        ];
        match checks.into_iter().find(|(_, ok, _)| !ok) {
            Some((path, _, message)) => Err(ConfigError::InvalidField {
                path: path.to_string(),
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn config_from_value(value: Value, label: &str) -> Result<SculptorConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: SculptorConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
