//! Structured prompt analysis returned alongside enhancement.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Breakdown of a prompt into the parts image generation cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAnalysis {
    #[serde(alias = "main_subject")]
    pub main_subject: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub lighting: String,
    #[serde(default, alias = "technical_requirements")]
    pub technical_requirements: Vec<String>,
}

impl PromptAnalysis {
    /// Fixed analysis used when the completion output cannot be parsed.
    pub fn placeholder() -> Self {
        Self {
            main_subject: "unknown".to_string(),
            environment: "unspecified".to_string(),
            lighting: "unspecified".to_string(),
            technical_requirements: Vec::new(),
        }
    }
}

/// Parse completion output into an analysis.
///
/// Tolerates prose or code fences around the JSON object.
pub fn parse_analysis(raw: &str) -> Result<PromptAnalysis, AnalysisError> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    let body = match (start, end) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => return Err(AnalysisError::Malformed("no JSON object in output".to_string())),
    };
    let analysis: PromptAnalysis =
        serde_json::from_str(body).map_err(|err| AnalysisError::Malformed(err.to_string()))?;
    if analysis.main_subject.trim().is_empty() {
        return Err(AnalysisError::Malformed("main subject is empty".to_string()));
    }
    Ok(analysis)
}
