//! Text-completion client abstraction and the Ollama HTTP implementation.

use crate::error::{CompletionError, SetupError};
use async_trait::async_trait;
use log::{debug, warn};
use sculptor_rs_config::CompletionConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl From<&CompletionConfig> for CompletionOptions {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        }
    }
}

/// A single non-streaming completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Instruction framing the prompt.
    pub system: Option<String>,
    /// Text to complete.
    pub prompt: String,
    /// Ask the endpoint to constrain output to a JSON object.
    pub json: bool,
}

impl CompletionRequest {
    /// Plain-text request with an optional system instruction.
    pub fn new(system: Option<&str>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.map(str::to_string),
            prompt: prompt.into(),
            json: false,
        }
    }

    /// Request a JSON object response.
    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }
}

/// Text-completion backend used for prompt enhancement.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Cheap reachability probe; never errors.
    async fn is_available(&self) -> bool;

    /// Run a completion and return the generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Client for an Ollama-compatible `/api/generate` endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    options: CompletionOptions,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateReply {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    /// Build a client from the completion section of the config.
    pub fn from_config(config: &CompletionConfig) -> Result<Self, SetupError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|err| SetupError::Client(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            options: CompletionOptions::from(config),
        })
    }

    /// Model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn is_available(&self) -> bool {
        match self.http.get(self.url("api/tags")).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                debug!(
                    "completion probe (url={}, status={})",
                    self.base_url,
                    response.status()
                );
                ok
            }
            Err(err) => {
                warn!("completion endpoint unreachable (url={}): {}", self.base_url, err);
                false
            }
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = GenerateBody {
            model: &self.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            format: request.json.then_some("json"),
            options: GenerateOptions {
                temperature: self.options.temperature,
                top_p: self.options.top_p,
                num_predict: self.options.max_tokens,
            },
        };
        let response = self
            .http
            .post(self.url("api/generate"))
            .json(&body)
            .send()
            .await
            .map_err(|err| CompletionError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateReply = response
            .json()
            .await
            .map_err(|err| CompletionError::InvalidResponse(err.to_string()))?;
        debug!(
            "completion finished (model={}, output_len={})",
            self.model,
            reply.response.len()
        );
        Ok(reply.response)
    }
}
