//! Remote generation services (text-to-image, image-to-3D).

use crate::error::{ServiceError, SetupError};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::debug;
use sculptor_rs_config::GenerationConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Decoded reply from a generation service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceResponse {
    /// Generated payload, when the service produced one.
    pub result: Option<Vec<u8>>,
    /// Location of the payload on the service side, if reported.
    pub url: Option<String>,
}

impl ServiceResponse {
    /// Response carrying only a payload.
    pub fn with_result(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            result: Some(bytes.into()),
            url: None,
        }
    }

    /// Take the payload, failing when the service returned none.
    pub fn into_payload(self) -> Result<Vec<u8>, ServiceError> {
        self.result.ok_or(ServiceError::MissingResult)
    }
}

/// A remote app addressed by id.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Invoke `app_id` with a JSON input on behalf of `user_id`.
    async fn call(
        &self,
        app_id: &str,
        input: Value,
        user_id: &str,
    ) -> Result<ServiceResponse, ServiceError>;
}

/// JSON-over-HTTP service client authenticated with a bearer token.
///
/// Requests are `POST`ed to the configured URL template with the app id
/// substituted. The reply is `{"result": <base64 or null>, "url": <optional>}`.
pub struct HttpGenerationService {
    http: reqwest::Client,
    config: GenerationConfig,
}

#[derive(Serialize)]
struct CallBody<'a> {
    user_id: &'a str,
    input: &'a Value,
}

#[derive(Deserialize)]
struct CallReply {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl HttpGenerationService {
    pub fn from_config(config: &GenerationConfig) -> Result<Self, SetupError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|err| SetupError::Client(err.to_string()))?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn call(
        &self,
        app_id: &str,
        input: Value,
        user_id: &str,
    ) -> Result<ServiceResponse, ServiceError> {
        let url = self.config.app_url(app_id);
        debug!("calling generation service (app_id={app_id}, user_id={user_id})");
        let mut request = self.http.post(&url).json(&CallBody {
            user_id,
            input: &input,
        });
        if let Some(key) = self.config.api_key.as_deref().filter(|key| !key.is_empty()) {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|err| ServiceError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: CallReply = response
            .json()
            .await
            .map_err(|err| ServiceError::InvalidResponse(err.to_string()))?;
        decode_reply(reply)
    }
}

fn decode_reply(reply: CallReply) -> Result<ServiceResponse, ServiceError> {
    let result = match reply.result {
        Some(encoded) => Some(
            BASE64
                .decode(encoded.trim())
                .map_err(|err| ServiceError::InvalidPayload(err.to_string()))?,
        ),
        None => None,
    };
    Ok(ServiceResponse {
        result,
        url: reply.url,
    })
}
