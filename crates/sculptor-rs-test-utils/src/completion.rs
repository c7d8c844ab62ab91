//! Completion backends with canned behavior.

use async_trait::async_trait;
use parking_lot::Mutex;
use sculptor_rs_core::{CompletionClient, CompletionError, CompletionRequest};
use std::sync::Arc;

/// Available backend that always answers with the same text.
#[derive(Debug, Clone)]
pub struct FixedCompletion {
    response: String,
}

impl FixedCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for FixedCompletion {
    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Ok(self.response.clone())
    }
}

/// Fixed-response backend that keeps every request it receives.
#[derive(Debug, Clone)]
pub struct RecordingCompletion {
    response: String,
    seen: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl RecordingCompletion {
    pub fn new(response: impl Into<String>) -> (Self, Arc<Mutex<Vec<CompletionRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                response: response.into(),
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl CompletionClient for RecordingCompletion {
    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.seen.lock().push(request.clone());
        Ok(self.response.clone())
    }
}

/// Backend whose availability probe fails.
#[derive(Debug, Clone, Default)]
pub struct UnreachableCompletion;

#[async_trait]
impl CompletionClient for UnreachableCompletion {
    async fn is_available(&self) -> bool {
        false
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::Unavailable("connection refused".to_string()))
    }
}

/// Reachable backend that errors on every completion.
#[derive(Debug, Clone)]
pub struct FailingCompletion {
    message: String,
}

impl FailingCompletion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for FailingCompletion {
    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::Status {
            status: 500,
            body: self.message.clone(),
        })
    }
}
