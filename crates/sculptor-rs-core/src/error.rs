//! Error types for the generation pipeline and its clients.

use crate::pipeline::PipelineStage;
use sculptor_rs_memory::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by a text-completion endpoint.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// Endpoint could not be reached.
    #[error("completion endpoint unavailable: {0}")]
    Unavailable(String),
    /// Endpoint answered with a non-success status.
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body could not be decoded.
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
}

/// Errors returned by a remote generation service.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Service could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),
    /// Service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body was not the expected JSON shape.
    #[error("invalid service response: {0}")]
    InvalidResponse(String),
    /// Response carried no `result` payload.
    #[error("response is missing the result payload")]
    MissingResult,
    /// `result` payload could not be decoded.
    #[error("invalid result payload: {0}")]
    InvalidPayload(String),
}

/// Errors from structured prompt analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Completion call failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),
    /// Completion output was not a valid analysis object.
    #[error("malformed analysis: {0}")]
    Malformed(String),
}

/// Errors that terminate a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request carried a blank prompt.
    #[error("prompt must not be empty")]
    EmptyPrompt,
    /// Text-to-image call failed.
    #[error("image generation failed: {0}")]
    ImageGeneration(#[source] ServiceError),
    /// Image-to-3D call failed.
    #[error("3D model generation failed: {0}")]
    ModelGeneration(#[source] ServiceError),
    /// Artifact file could not be written.
    #[error("failed to write artifact {}: {source}", path.display())]
    ArtifactWrite {
        stage: PipelineStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Record could not be persisted after generation succeeded.
    #[error("generation succeeded but could not be recorded: {0}")]
    Storage(#[source] StoreError),
}

impl PipelineError {
    /// Stage in which the run failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::EmptyPrompt => PipelineStage::Enhancing,
            Self::ImageGeneration(_) => PipelineStage::GeneratingImage,
            Self::ModelGeneration(_) => PipelineStage::GeneratingModel,
            Self::ArtifactWrite { stage, .. } => *stage,
            Self::Storage(_) => PipelineStage::Persisting,
        }
    }
}

/// Errors raised while wiring a pipeline from config.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Artifact store could not be opened.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// HTTP client could not be constructed.
    #[error("http client error: {0}")]
    Client(String),
}
