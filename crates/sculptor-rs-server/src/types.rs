//! Request and response bodies.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use sculptor_rs_core::{GenerationOutcome, MemorySummary, PromptAnalysis};
use sculptor_rs_memory::GenerationRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub message: String,
    pub enhanced_prompt: String,
    pub image_ref: String,
    pub model_ref: String,
    pub memory: MemoryInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PromptAnalysis>,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            message: outcome.message,
            enhanced_prompt: outcome.enhanced_prompt,
            image_ref: outcome.image_ref,
            model_ref: outcome.model_ref,
            memory: MemoryInfo::from(outcome.memory),
            analysis: outcome.analysis,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub total_generations: usize,
    /// Latest record without its payloads.
    pub latest_generation: Option<RecordSummary>,
}

impl From<MemorySummary> for MemoryInfo {
    fn from(summary: MemorySummary) -> Self {
        Self {
            total_generations: summary.total_generations,
            latest_generation: summary
                .latest_generation
                .map(|record| RecordSummary::from_record(record, false)),
        }
    }
}

/// One history entry; payloads are base64 encoded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    pub enhanced_prompt: String,
    pub image_ref: String,
    pub model_ref: String,
    pub image_data: Option<String>,
    pub model_data: Option<String>,
}

impl RecordSummary {
    pub fn from_record(record: GenerationRecord, include_payloads: bool) -> Self {
        let encode = |bytes: Option<Vec<u8>>| {
            bytes
                .filter(|_| include_payloads)
                .map(|bytes| BASE64.encode(bytes))
        };
        Self {
            id: record.id,
            timestamp: record.timestamp,
            prompt: record.original_prompt,
            enhanced_prompt: record.enhanced_prompt,
            image_ref: record.image_ref,
            model_ref: record.model_ref,
            image_data: encode(record.image_bytes),
            model_data: encode(record.model_bytes),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
