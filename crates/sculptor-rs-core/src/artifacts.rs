//! Artifact files written alongside each generation record.

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};

/// Directory that receives generated images and models.
#[derive(Debug, Clone)]
pub struct ArtifactFiles {
    root: PathBuf,
}

impl ArtifactFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filename key for a run started at `at`; microseconds keep
    /// concurrent runs apart.
    pub fn key(at: DateTime<Utc>) -> String {
        at.format("%Y%m%d_%H%M%S_%6f").to_string()
    }

    pub fn image_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("output_{key}.png"))
    }

    pub fn model_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("model_{key}.glb"))
    }

    /// Write `bytes` to `path`, creating the artifact directory if needed.
    pub async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(path, bytes).await
    }
}
