//! Environment variable overrides applied after file layers.

use crate::{ConfigError, SculptorConfig};
use log::debug;
use std::path::PathBuf;

/// Prefix shared by every recognised environment variable.
pub const ENV_PREFIX: &str = "SCULPTOR_";

impl SculptorConfig {
    /// Apply overrides resolved through `lookup`, returning the variables used.
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// wipe a file setting.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<Vec<String>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();
        let mut read = |suffix: &str| -> Option<String> {
            let name = format!("{ENV_PREFIX}{suffix}");
            let value = lookup(&name).filter(|value| !value.trim().is_empty())?;
            applied.push(name);
            Some(value)
        };

        if let Some(value) = read("API_KEY") {
            self.generation.api_key = Some(value);
        }
        if let Some(value) = read("TEXT_TO_IMAGE_APP") {
            self.generation.text_to_image_app = value;
        }
        if let Some(value) = read("IMAGE_TO_3D_APP") {
            self.generation.image_to_3d_app = value;
        }
        if let Some(value) = read("COMPLETION_URL") {
            self.completion.base_url = value;
        }
        if let Some(value) = read("COMPLETION_MODEL") {
            self.completion.model = value;
        }
        if let Some(value) = read("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(value);
        }
        if let Some(value) = read("PORT") {
            self.server.port = value.trim().parse().map_err(|_| ConfigError::InvalidField {
                path: format!("env:{ENV_PREFIX}PORT"),
                message: format!("expected port number, got {value:?}"),
            })?;
        }

        debug!("environment overrides applied (count={})", applied.len());
        self.validate()?;
        Ok(applied)
    }
}
