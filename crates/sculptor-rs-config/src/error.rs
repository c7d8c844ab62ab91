use thiserror::Error;

/// Failure while reading, merging or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    ReadFailed(#[from] std::io::Error),
    #[error("config is not valid JSON5: {0}")]
    ParseFailed(#[from] json5::Error),
    #[error("config does not match the expected shape: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// `path` is `<layer>:<field>`, a bare field for merged-config checks,
    /// or `env:<VARIABLE>` for environment overrides.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}
