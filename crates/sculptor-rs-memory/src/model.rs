//! Generation record model used by artifact stores.

use chrono::{DateTime, Utc};

/// One completed pipeline run, as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRecord {
    /// Store-assigned identifier, monotonically increasing.
    pub id: i64,
    /// Creation timestamp, assigned once at append time.
    pub timestamp: DateTime<Utc>,
    /// Prompt as submitted by the caller.
    pub original_prompt: String,
    /// Prompt after enhancement.
    pub enhanced_prompt: String,
    /// Location of the stored image artifact.
    pub image_ref: String,
    /// Location of the stored 3D model artifact.
    pub model_ref: String,
    /// Raw image payload when stored inline.
    pub image_bytes: Option<Vec<u8>>,
    /// Raw model payload when stored inline.
    pub model_bytes: Option<Vec<u8>>,
}

/// Record contents before the store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGenerationRecord {
    pub original_prompt: String,
    pub enhanced_prompt: String,
    pub image_ref: String,
    pub model_ref: String,
    pub image_bytes: Option<Vec<u8>>,
    pub model_bytes: Option<Vec<u8>>,
}

impl NewGenerationRecord {
    /// Finalize into a persisted record.
    pub fn into_record(self, id: i64, timestamp: DateTime<Utc>) -> GenerationRecord {
        GenerationRecord {
            id,
            timestamp,
            original_prompt: self.original_prompt,
            enhanced_prompt: self.enhanced_prompt,
            image_ref: self.image_ref,
            model_ref: self.model_ref,
            image_bytes: self.image_bytes,
            model_bytes: self.model_bytes,
        }
    }
}
