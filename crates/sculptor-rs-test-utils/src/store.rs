//! Artifact stores that fail on demand.

use async_trait::async_trait;
use sculptor_rs_memory::{
    ArtifactStore, GenerationRecord, NewGenerationRecord, SqliteArtifactStore, StoreError,
};
use std::io;

/// Store that reads from an in-memory database but rejects every append.
pub struct FailingStore {
    inner: SqliteArtifactStore,
}

impl FailingStore {
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self {
            inner: SqliteArtifactStore::open_in_memory()?,
        })
    }
}

#[async_trait]
impl ArtifactStore for FailingStore {
    async fn append(&self, _record: NewGenerationRecord) -> Result<GenerationRecord, StoreError> {
        Err(StoreError::Io(io::Error::other("disk full")))
    }

    async fn list_all(&self) -> Result<Vec<GenerationRecord>, StoreError> {
        self.inner.list_all().await
    }
}

/// Store that records appends but fails count and latest-record reads.
pub struct UncountableStore {
    inner: SqliteArtifactStore,
}

impl UncountableStore {
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self {
            inner: SqliteArtifactStore::open_in_memory()?,
        })
    }
}

#[async_trait]
impl ArtifactStore for UncountableStore {
    async fn append(&self, record: NewGenerationRecord) -> Result<GenerationRecord, StoreError> {
        self.inner.append(record).await
    }

    async fn list_all(&self) -> Result<Vec<GenerationRecord>, StoreError> {
        self.inner.list_all().await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Err(StoreError::Io(io::Error::other("database is locked")))
    }

    async fn latest(&self) -> Result<Option<GenerationRecord>, StoreError> {
        Err(StoreError::Io(io::Error::other("database is locked")))
    }
}

/// Record contents with placeholder refs and no payloads.
pub fn record(prompt: &str) -> NewGenerationRecord {
    NewGenerationRecord {
        original_prompt: prompt.to_string(),
        enhanced_prompt: format!("{prompt}, detailed"),
        image_ref: "memory/artifacts/output_test.png".to_string(),
        model_ref: "memory/artifacts/model_test.glb".to_string(),
        image_bytes: None,
        model_bytes: None,
    }
}
