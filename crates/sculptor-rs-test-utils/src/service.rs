//! Generation service answering from a script.

use async_trait::async_trait;
use parking_lot::Mutex;
use sculptor_rs_core::{GenerationService, ServiceError, ServiceResponse};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// One call received by a [`ScriptedService`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub app_id: String,
    pub input: Value,
    pub user_id: String,
}

/// Service answering each app id with a scripted reply.
///
/// Apps without a script answer `ServiceError::Unavailable`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedService {
    replies: HashMap<String, Result<ServiceResponse, ServiceError>>,
    calls: Arc<Mutex<Vec<ServiceCall>>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `app_id` with `bytes` as the result payload.
    pub fn with_result(self, app_id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.with_reply(app_id, Ok(ServiceResponse::with_result(bytes)))
    }

    pub fn with_reply(
        mut self,
        app_id: impl Into<String>,
        reply: Result<ServiceResponse, ServiceError>,
    ) -> Self {
        self.replies.insert(app_id.into(), reply);
        self
    }

    /// Shared log of received calls, in order.
    pub fn calls(&self) -> Arc<Mutex<Vec<ServiceCall>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn call(
        &self,
        app_id: &str,
        input: Value,
        user_id: &str,
    ) -> Result<ServiceResponse, ServiceError> {
        self.calls.lock().push(ServiceCall {
            app_id: app_id.to_string(),
            input,
            user_id: user_id.to_string(),
        });
        self.replies
            .get(app_id)
            .cloned()
            .unwrap_or_else(|| Err(ServiceError::Unavailable(format!("no script for {app_id}"))))
    }
}
