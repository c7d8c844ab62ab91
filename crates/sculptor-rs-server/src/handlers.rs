//! Route handlers for the generation service.

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;
use crate::types::{GenerateRequest, GenerateResponse, HealthResponse, RecordSummary};
use axum::Json;
use axum::extract::{Path, State};
use log::info;
use sculptor_rs_core::{GenerationInput, UserConfig};
use std::collections::HashMap;

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub(crate) async fn generate(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let user_id = request
        .user_id
        .filter(|user_id| !user_id.trim().is_empty())
        .unwrap_or_else(|| state.default_user.clone());
    let user_config = state.user_configs.resolve(&user_id);
    let outcome = state
        .pipeline
        .run(GenerationInput::new(request.prompt, user_id), &user_config)
        .await?;
    Ok(Json(GenerateResponse::from(outcome)))
}

pub(crate) async fn history(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecordSummary>>, ApiError> {
    let records = state.pipeline.store().list_all().await?;
    Ok(Json(
        records
            .into_iter()
            .map(|record| RecordSummary::from_record(record, true))
            .collect(),
    ))
}

pub(crate) async fn update_config(
    State(state): State<AppState>,
    JsonBody(updates): JsonBody<HashMap<String, UserConfig>>,
) -> Result<Json<HashMap<String, UserConfig>>, ApiError> {
    if updates.keys().any(|user_id| user_id.trim().is_empty()) {
        return Err(ApiError::bad_request("user id must not be empty"));
    }
    if let Some((user_id, _)) = updates.iter().find(|(_, config)| {
        config.text_to_image_app.trim().is_empty() || config.image_to_3d_app.trim().is_empty()
    }) {
        return Err(ApiError::bad_request(format!(
            "app ids for user {user_id} must not be empty"
        )));
    }
    info!("applying user config update (users={})", updates.len());
    state.user_configs.apply(updates.clone());
    Ok(Json(updates))
}

pub(crate) async fn get_config(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<UserConfig> {
    Json(state.user_configs.resolve(&user_id))
}
