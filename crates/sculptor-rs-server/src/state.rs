//! Shared state handed to every handler.

use sculptor_rs_config::SculptorConfig;
use sculptor_rs_core::{Pipeline, SetupError, UserConfig, UserConfigStore};
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub user_configs: Arc<UserConfigStore>,
    /// User id applied when a request names none.
    pub default_user: String,
}

impl AppState {
    pub fn new(
        pipeline: Pipeline,
        user_configs: UserConfigStore,
        default_user: impl Into<String>,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            user_configs: Arc::new(user_configs),
            default_user: default_user.into(),
        }
    }

    /// Build the default pipeline and user registry from config.
    pub fn from_config(config: &SculptorConfig) -> Result<Self, SetupError> {
        let pipeline = Pipeline::from_config(config)?;
        let user_configs = UserConfigStore::new(UserConfig::from_generation(&config.generation));
        Ok(Self::new(
            pipeline,
            user_configs,
            config.generation.default_user.clone(),
        ))
    }
}
