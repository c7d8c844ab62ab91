//! Generation history for Sculptor: persisted records and prompt recall.

pub mod error;
pub mod model;
pub mod similarity;
pub mod store;

/// Store error type.
pub use error::StoreError;
/// Generation record models.
pub use model::{GenerationRecord, NewGenerationRecord};
/// Prompt similarity helpers.
pub use similarity::{MATCH_THRESHOLD, find_best_match, similarity};
/// Artifact store interface and the default SQLite implementation.
pub use store::{ArtifactStore, SqliteArtifactStore};
