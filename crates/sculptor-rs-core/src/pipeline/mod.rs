//! Generation pipeline
//!
//! One run chains prompt enhancement, text-to-image, image-to-3D and
//! persistence. Stages run strictly in order and the first failure ends the
//! run; nothing is recorded unless every generation stage succeeded.

mod stage;

pub use stage::PipelineStage;

use crate::analysis::PromptAnalysis;
use crate::artifacts::ArtifactFiles;
use crate::completion::{CompletionClient, OllamaClient};
use crate::enhance::PromptEnhancer;
use crate::error::{PipelineError, SetupError};
use crate::service::{GenerationService, HttpGenerationService};
use crate::user_config::UserConfig;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use log::{debug, info, warn};
use sculptor_rs_config::SculptorConfig;
use sculptor_rs_memory::{
    ArtifactStore, GenerationRecord, NewGenerationRecord, SqliteArtifactStore, find_best_match,
};
use serde_json::json;
use stage::RunTracker;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Input for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInput {
    pub prompt: String,
    pub user_id: String,
}

impl GenerationInput {
    pub fn new(prompt: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            user_id: user_id.into(),
        }
    }
}

/// Store totals reported after a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySummary {
    pub total_generations: usize,
    pub latest_generation: Option<GenerationRecord>,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub run_id: Uuid,
    pub message: String,
    pub enhanced_prompt: String,
    pub image_ref: String,
    pub model_ref: String,
    /// Present only when analysis is enabled.
    pub analysis: Option<PromptAnalysis>,
    /// The record written for this run.
    pub record: GenerationRecord,
    pub memory: MemorySummary,
}

/// Orchestrates generation runs over injected clients and storage.
pub struct Pipeline {
    store: Arc<dyn ArtifactStore>,
    enhancer: PromptEnhancer,
    service: Arc<dyn GenerationService>,
    files: ArtifactFiles,
    analyze: bool,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        completion: Arc<dyn CompletionClient>,
        service: Arc<dyn GenerationService>,
        files: ArtifactFiles,
    ) -> Self {
        Self {
            store,
            enhancer: PromptEnhancer::new(completion),
            service,
            files,
            analyze: false,
        }
    }

    /// Request a structured prompt analysis on every run.
    pub fn with_analysis(mut self, analyze: bool) -> Self {
        self.analyze = analyze;
        self
    }

    /// Wire the default SQLite store and HTTP clients from config.
    pub fn from_config(config: &SculptorConfig) -> Result<Self, SetupError> {
        let store = SqliteArtifactStore::open(config.storage.database_path())?;
        let completion = OllamaClient::from_config(&config.completion)?;
        let service = HttpGenerationService::from_config(&config.generation)?;
        info!(
            "pipeline configured (completion_model={}, artifacts={}, analyze={})",
            completion.model(),
            config.storage.artifacts_path().display(),
            config.pipeline.analyze
        );
        Ok(Self::new(
            Arc::new(store),
            Arc::new(completion),
            Arc::new(service),
            ArtifactFiles::new(config.storage.artifacts_path()),
        )
        .with_analysis(config.pipeline.analyze))
    }

    /// Store backing this pipeline.
    pub fn store(&self) -> Arc<dyn ArtifactStore> {
        self.store.clone()
    }

    /// Run one generation for `input` using the app ids in `user_config`.
    pub async fn run(
        &self,
        input: GenerationInput,
        user_config: &UserConfig,
    ) -> Result<GenerationOutcome, PipelineError> {
        let mut tracker = RunTracker::start(Uuid::new_v4());
        let result = self.execute(&input, user_config, &mut tracker).await;
        match &result {
            Ok(outcome) => {
                tracker.advance();
                info!(
                    "pipeline run finished (run_id={}, record_id={}, total_generations={})",
                    outcome.run_id, outcome.record.id, outcome.memory.total_generations
                );
            }
            Err(err) => tracker.fail(err),
        }
        result
    }

    async fn execute(
        &self,
        input: &GenerationInput,
        user_config: &UserConfig,
        tracker: &mut RunTracker,
    ) -> Result<GenerationOutcome, PipelineError> {
        let prompt = input.prompt.trim();
        if prompt.is_empty() {
            return Err(PipelineError::EmptyPrompt);
        }
        let run_id = tracker.run_id();
        info!(
            "pipeline run (run_id={}, user_id={}, prompt_len={})",
            run_id,
            input.user_id,
            prompt.len()
        );

        // Enhancing: history only informs the rewrite, so a read failure
        // degrades to "no prior context".
        let history = match self.store.list_all().await {
            Ok(history) => history,
            Err(err) => {
                warn!("history unavailable, no prior context (run_id={run_id}): {err}");
                Vec::new()
            }
        };
        let matched = find_best_match(prompt, &history);
        if let Some(prior) = matched {
            debug!("prior generation matched (run_id={}, record_id={})", run_id, prior.id);
        }
        let enhanced_prompt = self.enhancer.enhance(prompt, matched).await;
        let analysis = if self.analyze {
            Some(self.enhancer.analyze(prompt).await.unwrap_or_else(|err| {
                warn!("prompt analysis unusable, using placeholder (run_id={run_id}): {err}");
                PromptAnalysis::placeholder()
            }))
        } else {
            None
        };
        tracker.advance();

        let key = ArtifactFiles::key(Utc::now());
        let image = self
            .service
            .call(
                &user_config.text_to_image_app,
                json!({ "prompt": enhanced_prompt }),
                &input.user_id,
            )
            .await
            .and_then(|response| response.into_payload())
            .map_err(PipelineError::ImageGeneration)?;
        let image_path = self.files.image_path(&key);
        self.write_artifact(tracker, image_path.clone(), &image).await?;
        tracker.advance();

        let model = self
            .service
            .call(
                &user_config.image_to_3d_app,
                json!({ "image": BASE64.encode(&image) }),
                &input.user_id,
            )
            .await
            .and_then(|response| response.into_payload())
            .map_err(PipelineError::ModelGeneration)?;
        let model_path = self.files.model_path(&key);
        self.write_artifact(tracker, model_path.clone(), &model).await?;
        tracker.advance();

        let image_ref = image_path.display().to_string();
        let model_ref = model_path.display().to_string();
        let record = self
            .store
            .append(NewGenerationRecord {
                original_prompt: prompt.to_string(),
                enhanced_prompt: enhanced_prompt.clone(),
                image_ref: image_ref.clone(),
                model_ref: model_ref.clone(),
                image_bytes: Some(image),
                model_bytes: Some(model),
            })
            .await
            .map_err(|err| {
                warn!(
                    "artifacts written but not recorded (run_id={}, image={}, model={})",
                    run_id, image_ref, model_ref
                );
                PipelineError::Storage(err)
            })?;
        let memory = self.memory_summary(run_id, &record).await;

        Ok(GenerationOutcome {
            run_id,
            message: format!("Successfully generated 3D model from prompt: {prompt}"),
            enhanced_prompt,
            image_ref,
            model_ref,
            analysis,
            record,
            memory,
        })
    }

    /// Summarize stored history after `record` was appended.
    ///
    /// The record is already durable here, so read failures fall back to
    /// what the append returned instead of failing the run.
    async fn memory_summary(&self, run_id: Uuid, record: &GenerationRecord) -> MemorySummary {
        let total_generations = match self.store.count().await {
            Ok(count) => count,
            Err(err) => {
                warn!("history count unavailable (run_id={run_id}): {err}");
                usize::try_from(record.id).unwrap_or(1)
            }
        };
        let latest_generation = match self.store.latest().await {
            Ok(latest) => latest,
            Err(err) => {
                warn!("latest generation unavailable (run_id={run_id}): {err}");
                Some(record.clone())
            }
        };
        MemorySummary {
            total_generations,
            latest_generation,
        }
    }

    async fn write_artifact(
        &self,
        tracker: &RunTracker,
        path: PathBuf,
        bytes: &[u8],
    ) -> Result<(), PipelineError> {
        match self.files.write(&path, bytes).await {
            Ok(()) => {
                debug!(
                    "artifact written (run_id={}, path={}, bytes={})",
                    tracker.run_id(),
                    path.display(),
                    bytes.len()
                );
                Ok(())
            }
            Err(source) => Err(PipelineError::ArtifactWrite {
                stage: tracker.stage(),
                path,
                source,
            }),
        }
    }
}
