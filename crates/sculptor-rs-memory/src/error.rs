//! Error types for artifact store operations.

/// Errors returned by artifact stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A persisted timestamp could not be parsed.
    #[error("invalid timestamp {value:?}: {message}")]
    InvalidTimestamp { value: String, message: String },
}
