//! Report rows for exact-duplicate groups and similar pairs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::Result;

/// Appended to any text cut short for display
pub const TRUNCATION_MARKER: &str = "...";

/// Keep the first `max_len` chars of `text`, appending [`TRUNCATION_MARKER`]
/// when anything was cut. `max_len == 0` disables truncation.
pub fn truncate_text(text: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed(text);
    }
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => {
            let mut truncated = String::with_capacity(cut + TRUNCATION_MARKER.len());
            truncated.push_str(&text[..cut]);
            truncated.push_str(TRUNCATION_MARKER);
            Cow::Owned(truncated)
        }
        None => Cow::Borrowed(text),
    }
}

/// Render a similarity score with three decimals
pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

/// One member of an exact-duplicate group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactDuplicateRow {
    pub group_id: usize,
    pub position: usize,
    pub metadata: Map<String, Value>,
    pub text: String,
    pub normalized_text: String,
    pub count_in_group: usize,
}

/// One accepted near-duplicate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPairRow {
    pub position_a: usize,
    pub position_b: usize,
    pub similarity: String,
    pub metadata_a: Map<String, Value>,
    pub text_a: String,
    pub metadata_b: Map<String, Value>,
    pub text_b: String,
}

/// All exact-duplicate rows of a run, grouped rows adjacent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExactDuplicateReport {
    pub rows: Vec<ExactDuplicateRow>,
}

impl ExactDuplicateReport {
    /// Number of distinct groups
    pub fn group_count(&self) -> usize {
        let mut count = 0;
        let mut last = None;
        for row in &self.rows {
            if last != Some(row.group_id) {
                count += 1;
                last = Some(row.group_id);
            }
        }
        count
    }

    /// Render as JSON Lines, one row per line
    pub fn to_json_lines(&self) -> Result<String> {
        to_json_lines(&self.rows)
    }
}

/// All similar-pair rows of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarPairReport {
    pub rows: Vec<SimilarPairRow>,
}

impl SimilarPairReport {
    /// Render as JSON Lines, one row per line
    pub fn to_json_lines(&self) -> Result<String> {
        to_json_lines(&self.rows)
    }
}

fn to_json_lines<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(row)?);
        out.push('\n');
    }
    Ok(out)
}
