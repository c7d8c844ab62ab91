//! Core generation pipeline for Sculptor.
//!
//! This crate owns the completion and remote-service clients, prompt
//! enhancement, per-user configuration and the pipeline that chains
//! enhancement, image generation, 3D generation and persistence.

pub mod analysis;
pub mod artifacts;
pub mod completion;
pub mod enhance;
pub mod error;
pub mod pipeline;
pub mod service;
pub mod user_config;

pub use analysis::PromptAnalysis;
pub use artifacts::ArtifactFiles;
pub use completion::{CompletionClient, CompletionOptions, CompletionRequest, OllamaClient};
pub use enhance::PromptEnhancer;
pub use error::{AnalysisError, CompletionError, PipelineError, ServiceError, SetupError};
/// Pipeline facade and run types.
pub use pipeline::{GenerationInput, GenerationOutcome, MemorySummary, Pipeline, PipelineStage};
pub use service::{GenerationService, HttpGenerationService, ServiceResponse};
pub use user_config::{UserConfig, UserConfigStore};
