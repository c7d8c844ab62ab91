//! Error responses shared by every handler.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{debug, error, warn};
use sculptor_rs_core::PipelineError;
use sculptor_rs_memory::StoreError;
use serde::Serialize;

/// Error body returned by every endpoint on failure.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Handler error carrying the status and caller-visible detail.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::EmptyPrompt => Self::bad_request(err.to_string()),
            PipelineError::ImageGeneration(_) | PipelineError::ModelGeneration(_) => {
                warn!("upstream generation failed: {err}");
                Self::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
            PipelineError::Storage(_) | PipelineError::ArtifactWrite { .. } => {
                error!("generation request failed: {err}");
                Self::internal(err.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!("history read failed: {err}");
        Self::internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("request body rejected (status={})", rejection.status());
        Self::new(rejection.status(), rejection.body_text())
    }
}
