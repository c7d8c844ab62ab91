//! Prompt enhancement through a text-completion backend.
//!
//! Enhancement never fails: when the backend is unreachable, errors, or
//! returns nothing usable, the caller's prompt comes back unchanged.

use crate::analysis::{PromptAnalysis, parse_analysis};
use crate::completion::{CompletionClient, CompletionRequest};
use crate::error::AnalysisError;
use log::{debug, error, info};
use sculptor_rs_memory::GenerationRecord;
use std::sync::Arc;

/// Instruction sent with every enhancement request.
pub const ENHANCEMENT_INSTRUCTION: &str = "You are an expert at enhancing visual descriptions for AI image generation. \
Expand the given prompt with rich detail about:
- visual elements and composition
- lighting and atmosphere
- colors and textures
- style and mood
Keep the core idea intact while making it more vivid and detailed.";

const ANALYSIS_INSTRUCTION: &str = "Analyze the image prompt and answer with a single JSON object \
with the keys \"main_subject\" (string), \"environment\" (string), \"lighting\" (string) and \
\"technical_requirements\" (array of strings). Output nothing but the JSON object.";

/// Label the completion output is primed with; echoed copies are stripped.
const ENHANCED_LABEL: &str = "Enhanced prompt:";

/// Wraps a completion client with the enhancement and analysis prompts.
#[derive(Clone)]
pub struct PromptEnhancer {
    client: Arc<dyn CompletionClient>,
}

impl PromptEnhancer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Enhance `prompt`, using `matched` as prior context when present.
    pub async fn enhance(&self, prompt: &str, matched: Option<&GenerationRecord>) -> String {
        if !self.client.is_available().await {
            error!("completion backend unavailable; using prompt unchanged");
            return prompt.to_string();
        }

        let request = enhancement_request(prompt, matched);
        match self.client.complete(&request).await {
            Ok(raw) => match clean_completion(&raw) {
                Some(enhanced) => {
                    info!(
                        "prompt enhanced (input_len={}, output_len={}, prior_context={})",
                        prompt.len(),
                        enhanced.len(),
                        matched.is_some()
                    );
                    enhanced
                }
                None => {
                    debug!("completion output empty after cleanup; using prompt unchanged");
                    prompt.to_string()
                }
            },
            Err(err) => {
                error!("prompt enhancement failed: {err}");
                prompt.to_string()
            }
        }
    }

    /// Ask the backend for a structured breakdown of `prompt`.
    pub async fn analyze(&self, prompt: &str) -> Result<PromptAnalysis, AnalysisError> {
        let request = CompletionRequest::new(Some(ANALYSIS_INSTRUCTION), prompt).with_json();
        let raw = self.client.complete(&request).await?;
        parse_analysis(&raw)
    }
}

/// Build the completion request for `prompt`.
pub fn enhancement_request(prompt: &str, matched: Option<&GenerationRecord>) -> CompletionRequest {
    let request_text = match matched {
        Some(prior) => format!(
            "Based on this previous request '{}', enhance this new request: {prompt}",
            prior.original_prompt
        ),
        None => prompt.to_string(),
    };
    CompletionRequest::new(
        Some(ENHANCEMENT_INSTRUCTION),
        format!("Original prompt: {request_text}\n\n{ENHANCED_LABEL}"),
    )
}

/// Strip echoed labels and whitespace; `None` when nothing remains.
pub fn clean_completion(raw: &str) -> Option<String> {
    let mut cleaned = raw.to_string();
    // Removal can splice a new label together, so repeat until none remain.
    while cleaned.contains(ENHANCED_LABEL) {
        cleaned = cleaned.replace(ENHANCED_LABEL, "");
    }
    let trimmed = cleaned.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
