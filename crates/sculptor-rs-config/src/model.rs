//! Configuration schema for Sculptor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root config for the Sculptor service and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SculptorConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

/// Where generation records and artifact files live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_database_file")]
    pub database_file: String,
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: String,
}

impl StorageConfig {
    /// SQLite database path.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Directory receiving image and model files.
    pub fn artifacts_path(&self) -> PathBuf {
        self.data_dir.join(&self.artifacts_dir)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: default_database_file(),
            artifacts_dir: default_artifacts_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("memory")
}

fn default_database_file() -> String {
    "memory.db".to_string()
}

fn default_artifacts_dir() -> String {
    "artifacts".to_string()
}

/// Local text-completion server used for prompt enhancement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionConfig {
    #[serde(default = "default_completion_url")]
    pub base_url: String,
    #[serde(default = "default_completion_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout; unset waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_url(),
            model: default_completion_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

fn default_completion_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_completion_model() -> String {
    "deepseek-coder".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_max_tokens() -> u32 {
    500
}

/// Placeholder substituted with an app id in `base_url_template`.
pub const APP_ID_PLACEHOLDER: &str = "{app_id}";

/// Remote text-to-image and image-to-3D services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    /// Execution URL for an app; `{app_id}` is replaced per call.
    #[serde(default = "default_base_url_template")]
    pub base_url_template: String,
    /// Bearer token sent to both services.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_text_to_image_app")]
    pub text_to_image_app: String,
    #[serde(default = "default_image_to_3d_app")]
    pub image_to_3d_app: String,
    /// User id assumed when a request does not name one.
    #[serde(default = "default_user")]
    pub default_user: String,
    /// Request timeout; unset waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl GenerationConfig {
    /// Resolve the execution URL for an app id.
    pub fn app_url(&self, app_id: &str) -> String {
        self.base_url_template.replace(APP_ID_PLACEHOLDER, app_id)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url_template: default_base_url_template(),
            api_key: None,
            text_to_image_app: default_text_to_image_app(),
            image_to_3d_app: default_image_to_3d_app(),
            default_user: default_user(),
            timeout_secs: None,
        }
    }
}

fn default_base_url_template() -> String {
    format!("https://{APP_ID_PLACEHOLDER}/execution")
}

fn default_text_to_image_app() -> String {
    "f0997a01-d6d3-a5fe-53d8-561300318557.node3.openfabric.network".to_string()
}

fn default_image_to_3d_app() -> String {
    "69543f29-4d41-4afc-7f29-3d51591f11eb.node3.openfabric.network".to_string()
}

fn default_user() -> String {
    "super-user".to_string()
}

/// Pipeline behaviour flags.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Request a structured prompt analysis alongside enhancement.
    #[serde(default)]
    pub analyze: bool,
}
