//! Reasoning Summaries
//!
//! Condenses free-form reasoning traces into a handful of short steps.

use regex::Regex;
use std::sync::LazyLock;

/// Appended when a summary was cut short.
pub const TRUNCATION_MARKER: &str = "…";

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.?!\n]+").expect("sentence boundary pattern is valid"));

/// Split each fragment into sentence-like chunks, keep at most `limit` of them, and
/// mark truncation with [`TRUNCATION_MARKER`].
pub fn summarize_thoughts<S: AsRef<str>>(thoughts: &[S], limit: usize) -> Vec<String> {
    let mut steps: Vec<String> = thoughts
        .iter()
        .flat_map(|thought| SENTENCE_BOUNDARY.split(thought.as_ref()))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect();

    if steps.len() > limit {
        steps.truncate(limit);
        steps.push(TRUNCATION_MARKER.to_string());
    }
    steps
}
