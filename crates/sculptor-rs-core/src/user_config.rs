//! Per-user app id selection.

use log::info;
use parking_lot::RwLock;
use sculptor_rs_config::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// App ids used for one user's pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    pub text_to_image_app: String,
    pub image_to_3d_app: String,
}

impl UserConfig {
    /// Service-wide defaults from the generation config.
    pub fn from_generation(config: &GenerationConfig) -> Self {
        Self {
            text_to_image_app: config.text_to_image_app.clone(),
            image_to_3d_app: config.image_to_3d_app.clone(),
        }
    }
}

/// In-memory registry of user configurations with a default fallback.
#[derive(Debug)]
pub struct UserConfigStore {
    defaults: UserConfig,
    entries: RwLock<HashMap<String, UserConfig>>,
}

impl UserConfigStore {
    pub fn new(defaults: UserConfig) -> Self {
        Self {
            defaults,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register or replace the configuration for each user in `updates`.
    pub fn apply(&self, updates: HashMap<String, UserConfig>) {
        let mut entries = self.entries.write();
        for (user_id, config) in updates {
            info!(
                "user config updated (user_id={}, text_to_image_app={}, image_to_3d_app={})",
                user_id, config.text_to_image_app, config.image_to_3d_app
            );
            entries.insert(user_id, config);
        }
    }

    /// Explicitly registered configuration for `user_id`.
    pub fn get(&self, user_id: &str) -> Option<UserConfig> {
        self.entries.read().get(user_id).cloned()
    }

    /// Configuration for `user_id`, falling back to the defaults.
    pub fn resolve(&self, user_id: &str) -> UserConfig {
        self.get(user_id).unwrap_or_else(|| self.defaults.clone())
    }

    pub fn defaults(&self) -> &UserConfig {
        &self.defaults
    }
}
