//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use sculptor_rs_core::{ArtifactFiles, Pipeline, ServiceResponse, UserConfig, UserConfigStore};
use sculptor_rs_memory::{ArtifactStore, SqliteArtifactStore};
use sculptor_rs_server::{AppState, router};
use sculptor_rs_test_utils::{FailingStore, FixedCompletion, ScriptedService};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

const DEFAULT_IMAGE_APP: &str = "default-image";
const DEFAULT_MODEL_APP: &str = "default-mesh";

fn defaults() -> UserConfig {
    UserConfig {
        text_to_image_app: DEFAULT_IMAGE_APP.to_string(),
        image_to_3d_app: DEFAULT_MODEL_APP.to_string(),
    }
}

fn working_service() -> ScriptedService {
    ScriptedService::new()
        .with_result(DEFAULT_IMAGE_APP, b"png".to_vec())
        .with_result(DEFAULT_MODEL_APP, b"glb".to_vec())
}

fn app(store: Arc<dyn ArtifactStore>, service: ScriptedService, dir: &Path) -> Router {
    let pipeline = Pipeline::new(
        store,
        Arc::new(FixedCompletion::new("a vivid lake at dawn")),
        Arc::new(service),
        ArtifactFiles::new(dir.join("artifacts")),
    );
    router(AppState::new(
        pipeline,
        UserConfigStore::new(defaults()),
        "super-user",
    ))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let app = app(store, working_service(), temp.path());
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn generate_returns_outcome_for_default_user() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let service = working_service();
    let calls = service.calls();
    let app = app(store, service, temp.path());

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/generate", json!({ "prompt": "a lake" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Successfully generated 3D model from prompt: a lake"
    );
    assert_eq!(body["enhancedPrompt"], "a vivid lake at dawn");
    assert_eq!(body["memory"]["totalGenerations"], 1);
    assert_eq!(body["memory"]["latestGeneration"]["prompt"], "a lake");
    assert_eq!(body["memory"]["latestGeneration"]["imageData"], Value::Null);
    assert!(body.get("analysis").is_none());
    assert!(
        body["imageRef"]
            .as_str()
            .expect("imageRef")
            .ends_with(".png")
    );
    let calls = calls.lock();
    assert!(calls.iter().all(|call| call.user_id == "super-user"));
}

#[tokio::test]
async fn blank_prompt_is_bad_request() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let app = app(store, working_service(), temp.path());
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/generate", json!({ "prompt": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "prompt must not be empty");
}

#[tokio::test]
async fn missing_image_result_is_bad_gateway_and_records_nothing() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let service = ScriptedService::new()
        .with_reply(DEFAULT_IMAGE_APP, Ok(ServiceResponse::default()))
        .with_result(DEFAULT_MODEL_APP, b"glb".to_vec());
    let app = app(store.clone(), service, temp.path());

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/generate", json!({ "prompt": "a lake" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(
        body["detail"]
            .as_str()
            .expect("detail")
            .contains("image generation failed")
    );
    assert_eq!(store.count().await.expect("count"), 0);
}

#[tokio::test]
async fn storage_failure_is_internal_error_with_detail() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(FailingStore::new().expect("store"));
    let app = app(store, working_service(), temp.path());

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/generate", json!({ "prompt": "a lake" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["detail"]
            .as_str()
            .expect("detail")
            .starts_with("generation succeeded but could not be recorded")
    );
    let written = std::fs::read_dir(temp.path().join("artifacts"))
        .expect("artifacts dir")
        .count();
    assert_eq!(written, 2);
}

#[tokio::test]
async fn history_lists_newest_first_with_base64_payloads() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let app = app(store, working_service(), temp.path());

    for prompt in ["a lake", "a mountain"] {
        let (status, _) = send(
            &app,
            json_request(Method::POST, "/generate", json!({ "prompt": prompt })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get("/history")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["prompt"], "a mountain");
    assert_eq!(entries[1]["prompt"], "a lake");
    assert_eq!(entries[0]["imageData"], "cG5n");
    assert_eq!(entries[0]["modelData"], "Z2xi");
}

#[tokio::test]
async fn user_config_selects_app_ids() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let service = working_service()
        .with_result("alice-image", b"png".to_vec())
        .with_result("alice-mesh", b"glb".to_vec());
    let calls = service.calls();
    let app = app(store, service, temp.path());

    let update = json!({
        "alice": { "textToImageApp": "alice-image", "imageTo3dApp": "alice-mesh" }
    });
    let (status, body) = send(&app, json_request(Method::PUT, "/config", update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, update);

    let (status, body) = send(&app, get("/config/alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["textToImageApp"], "alice-image");

    let (_, body) = send(&app, get("/config/bob")).await;
    assert_eq!(body["textToImageApp"], DEFAULT_IMAGE_APP);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/generate",
            json!({ "prompt": "a lake", "userId": "alice" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let apps: Vec<String> = calls.lock().iter().map(|call| call.app_id.clone()).collect();
    assert_eq!(apps, vec!["alice-image".to_string(), "alice-mesh".to_string()]);
}

#[tokio::test]
async fn config_update_rejects_blank_app_ids() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let app = app(store, working_service(), temp.path());
    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/config",
            json!({ "alice": { "textToImageApp": "", "imageTo3dApp": "mesh" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().expect("detail").contains("alice"));
}

#[tokio::test]
async fn generate_without_prompt_answers_with_detail() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let service = working_service();
    let calls = service.calls();
    let app = app(store, service, temp.path());

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/generate", json!({ "userId": "bob" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["detail"]
            .as_str()
            .expect("detail")
            .contains("prompt")
    );
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn generate_with_malformed_json_answers_with_detail() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let app = app(store, working_service(), temp.path());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .expect("request");

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn config_update_without_json_content_type_answers_with_detail() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(SqliteArtifactStore::open_in_memory().expect("store"));
    let app = app(store, working_service(), temp.path());
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/config")
        .body(Body::from(r#"{"alice": {}}"#))
        .expect("request");

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["detail"].is_string());
}
