//! Lexical prompt similarity used to recall prior generations.

use crate::model::GenerationRecord;
use log::debug;
use std::collections::HashSet;

/// Scores at or below this value never count as a match.
pub const MATCH_THRESHOLD: f64 = 0.3;

/// Lowercased whitespace-separated word set.
fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Shared words over the larger of the two word sets.
fn overlap(left: &HashSet<String>, right: &HashSet<String>) -> f64 {
    let denominator = left.len().max(right.len());
    if denominator == 0 {
        return 0.0;
    }
    let common = left.intersection(right).count();
    common as f64 / denominator as f64
}

/// Similarity score between two prompts in `[0, 1]`.
pub fn similarity(left: &str, right: &str) -> f64 {
    overlap(&word_set(left), &word_set(right))
}

/// Find the history entry whose original prompt best overlaps `prompt`.
///
/// Returns `None` for an empty history or when the best score does not
/// exceed [`MATCH_THRESHOLD`]. Ties keep the earliest entry, so pass history
/// newest-first to prefer recent generations.
pub fn find_best_match<'a>(
    prompt: &str,
    history: &'a [GenerationRecord],
) -> Option<&'a GenerationRecord> {
    let prompt_words = word_set(prompt);
    let mut best: Option<(&GenerationRecord, f64)> = None;
    for record in history {
        let score = overlap(&prompt_words, &word_set(&record.original_prompt));
        if score <= MATCH_THRESHOLD {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((record, score)),
        }
    }
    if let Some((record, score)) = best {
        debug!(
            "prompt matched history (record_id={}, score={:.3})",
            record.id, score
        );
    }
    best.map(|(record, _)| record)
}
