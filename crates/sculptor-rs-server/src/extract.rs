//! Request extractors whose rejections answer with the `{detail}` error body.

use crate::error::ApiError;
use axum::extract::FromRequest;

/// `axum::Json` with body rejections reported as [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub(crate) struct JsonBody<T>(pub T);
