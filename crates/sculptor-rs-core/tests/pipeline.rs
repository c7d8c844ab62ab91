//! End-to-end pipeline runs against fake clients.

use pretty_assertions::assert_eq;
use sculptor_rs_core::{
    ArtifactFiles, GenerationInput, Pipeline, PipelineError, PipelineStage, PromptAnalysis,
    ServiceError, ServiceResponse, UserConfig,
};
use sculptor_rs_memory::{ArtifactStore, SqliteArtifactStore};
use sculptor_rs_test_utils::{
    FailingCompletion, FailingStore, FixedCompletion, RecordingCompletion, ScriptedService,
    UncountableStore, UnreachableCompletion, record,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

const IMAGE_APP: &str = "image-app";
const MODEL_APP: &str = "mesh-app";
const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];
const GLB: &[u8] = b"glTF";

fn user_config() -> UserConfig {
    UserConfig {
        text_to_image_app: IMAGE_APP.to_string(),
        image_to_3d_app: MODEL_APP.to_string(),
    }
}

fn working_service() -> ScriptedService {
    ScriptedService::new()
        .with_result(IMAGE_APP, PNG)
        .with_result(MODEL_APP, GLB)
}

fn artifact_count(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path().join("artifacts"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn successful_run_records_and_reports() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let service = working_service();
    let calls = service.calls();
    let pipeline = Pipeline::new(
        store.clone(),
        Arc::new(FixedCompletion::new("Enhanced prompt: a glowing lake at dawn")),
        Arc::new(service),
        ArtifactFiles::new(temp.path().join("artifacts")),
    );

    let outcome = pipeline
        .run(GenerationInput::new("a lake", "alice"), &user_config())
        .await
        .expect("run");

    assert_eq!(outcome.message, "Successfully generated 3D model from prompt: a lake");
    assert_eq!(outcome.enhanced_prompt, "a glowing lake at dawn");
    assert_eq!(outcome.analysis, None);
    assert_eq!(outcome.memory.total_generations, 1);
    assert_eq!(outcome.memory.latest_generation.as_ref(), Some(&outcome.record));
    assert_eq!(std::fs::read(&outcome.image_ref).expect("image"), PNG.to_vec());
    assert_eq!(std::fs::read(&outcome.model_ref).expect("model"), GLB.to_vec());

    let calls = calls.lock().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].app_id, IMAGE_APP);
    assert_eq!(calls[0].user_id, "alice");
    assert_eq!(calls[0].input, json!({ "prompt": "a glowing lake at dawn" }));
    assert_eq!(calls[1].app_id, MODEL_APP);
    assert_eq!(calls[1].input, json!({ "image": "iVBORw==" }));

    let records = store.list_all().await.expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].original_prompt, "a lake");
    assert_eq!(records[0].image_bytes.as_deref(), Some(PNG));
    assert_eq!(records[0].model_bytes.as_deref(), Some(GLB));
}

#[tokio::test]
async fn similar_history_is_sent_as_prior_context() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    store
        .append(record("a red dragon on a cliff"))
        .await
        .expect("seed");
    let (completion, seen) = RecordingCompletion::new("a blue dragon, dramatic sky");
    let pipeline = Pipeline::new(
        store,
        Arc::new(completion),
        Arc::new(working_service()),
        ArtifactFiles::new(temp.path().join("artifacts")),
    );

    pipeline
        .run(GenerationInput::new("a blue dragon on a hill", "alice"), &user_config())
        .await
        .expect("run");

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].prompt.contains(
        "Based on this previous request 'a red dragon on a cliff', \
         enhance this new request: a blue dragon on a hill"
    ));
}

#[tokio::test]
async fn missing_image_result_fails_without_record() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let service = ScriptedService::new()
        .with_reply(IMAGE_APP, Ok(ServiceResponse::default()))
        .with_result(MODEL_APP, GLB);
    let calls = service.calls();
    let pipeline = Pipeline::new(
        store.clone(),
        Arc::new(FixedCompletion::new("a lake")),
        Arc::new(service),
        ArtifactFiles::new(temp.path().join("artifacts")),
    );

    let err = pipeline
        .run(GenerationInput::new("a lake", "alice"), &user_config())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::ImageGeneration(ServiceError::MissingResult)
    ));
    assert_eq!(err.stage(), PipelineStage::GeneratingImage);
    assert_eq!(calls.lock().len(), 1);
    assert_eq!(store.count().await.expect("count"), 0);
    assert_eq!(artifact_count(&temp), 0);
}

#[tokio::test]
async fn model_failure_keeps_image_but_records_nothing() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let service = ScriptedService::new()
        .with_result(IMAGE_APP, PNG)
        .with_reply(
            MODEL_APP,
            Err(ServiceError::Status {
                status: 503,
                body: "busy".to_string(),
            }),
        );
    let pipeline = Pipeline::new(
        store.clone(),
        Arc::new(FixedCompletion::new("a lake")),
        Arc::new(service),
        ArtifactFiles::new(temp.path().join("artifacts")),
    );

    let err = pipeline
        .run(GenerationInput::new("a lake", "alice"), &user_config())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ModelGeneration(_)));
    assert_eq!(err.stage(), PipelineStage::GeneratingModel);
    assert_eq!(store.count().await.expect("count"), 0);
    assert_eq!(artifact_count(&temp), 1);
}

#[tokio::test]
async fn storage_failure_is_reported_after_files_are_written() {
    let temp = tempdir().expect("tempdir");
    let pipeline = Pipeline::new(
        Arc::new(FailingStore::new().expect("store")),
        Arc::new(FixedCompletion::new("a lake")),
        Arc::new(working_service()),
        ArtifactFiles::new(temp.path().join("artifacts")),
    );

    let err = pipeline
        .run(GenerationInput::new("a lake", "alice"), &user_config())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Storage(_)));
    assert_eq!(err.stage(), PipelineStage::Persisting);
    assert!(
        err.to_string()
            .starts_with("generation succeeded but could not be recorded")
    );
    assert_eq!(artifact_count(&temp), 2);
}

#[tokio::test]
async fn summary_read_failure_after_append_still_succeeds() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(UncountableStore::new().expect("store"));
    let pipeline = Pipeline::new(
        store.clone(),
        Arc::new(FixedCompletion::new("a glowing lake")),
        Arc::new(working_service()),
        ArtifactFiles::new(temp.path().join("artifacts")),
    );

    let outcome = pipeline
        .run(GenerationInput::new("a lake", "alice"), &user_config())
        .await
        .expect("run");

    assert_eq!(outcome.memory.total_generations, 1);
    assert_eq!(outcome.memory.latest_generation.as_ref(), Some(&outcome.record));
    let records = store.list_all().await.expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, outcome.record.id);
}

#[tokio::test]
async fn unreachable_completion_keeps_prompt_verbatim() {
    let temp = tempdir().expect("tempdir");
    let service = working_service();
    let calls = service.calls();
    let pipeline = Pipeline::new(
        Arc::new(SqliteArtifactStore::open_in_memory().expect("store")),
        Arc::new(UnreachableCompletion),
        Arc::new(service),
        ArtifactFiles::new(temp.path().join("artifacts")),
    );

    let outcome = pipeline
        .run(GenerationInput::new("a lake", "alice"), &user_config())
        .await
        .expect("run");

    assert_eq!(outcome.enhanced_prompt, "a lake");
    assert_eq!(calls.lock()[0].input, json!({ "prompt": "a lake" }));
}

#[tokio::test]
async fn failing_completion_keeps_prompt_verbatim() {
    let temp = tempdir().expect("tempdir");
    let pipeline = Pipeline::new(
        Arc::new(SqliteArtifactStore::open_in_memory().expect("store")),
        Arc::new(FailingCompletion::new("model not loaded")),
        Arc::new(working_service()),
        ArtifactFiles::new(temp.path().join("artifacts")),
    );

    let outcome = pipeline
        .run(GenerationInput::new("a lake", "alice"), &user_config())
        .await
        .expect("run");
    assert_eq!(outcome.enhanced_prompt, "a lake");
}

#[tokio::test]
async fn blank_prompt_is_rejected_before_any_call() {
    let temp = tempdir().expect("tempdir");
    let service = working_service();
    let calls = service.calls();
    let pipeline = Pipeline::new(
        Arc::new(SqliteArtifactStore::open_in_memory().expect("store")),
        Arc::new(FixedCompletion::new("unused")),
        Arc::new(service),
        ArtifactFiles::new(temp.path().join("artifacts")),
    );

    let err = pipeline
        .run(GenerationInput::new("   ", "alice"), &user_config())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::EmptyPrompt));
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn malformed_analysis_falls_back_to_placeholder() {
    let temp = tempdir().expect("tempdir");
    let pipeline = Pipeline::new(
        Arc::new(SqliteArtifactStore::open_in_memory().expect("store")),
        Arc::new(FixedCompletion::new("a lake, misty")),
        Arc::new(working_service()),
        ArtifactFiles::new(temp.path().join("artifacts")),
    )
    .with_analysis(true);

    let outcome = pipeline
        .run(GenerationInput::new("a lake", "alice"), &user_config())
        .await
        .expect("run");
    assert_eq!(outcome.analysis, Some(PromptAnalysis::placeholder()));
}

#[tokio::test]
async fn analysis_is_parsed_when_well_formed() {
    let temp = tempdir().expect("tempdir");
    let pipeline = Pipeline::new(
        Arc::new(SqliteArtifactStore::open_in_memory().expect("store")),
        Arc::new(FixedCompletion::new(
            r#"{"main_subject": "lake", "environment": "forest", "lighting": "dawn", "technical_requirements": []}"#,
        )),
        Arc::new(working_service()),
        ArtifactFiles::new(temp.path().join("artifacts")),
    )
    .with_analysis(true);

    let outcome = pipeline
        .run(GenerationInput::new("a lake", "alice"), &user_config())
        .await
        .expect("run");
    let analysis = outcome.analysis.expect("analysis");
    assert_eq!(analysis.main_subject, "lake");
    assert_eq!(analysis.lighting, "dawn");
}
