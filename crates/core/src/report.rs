//! Report assembly from engine output
//!
//! Rows reference records by their caller-assigned `index` and echo their
//! metadata unchanged. Texts are cut to `text_max_len` chars for display.

use neardup_formats::{
    format_score, truncate_text, ExactDuplicateReport, ExactDuplicateRow, Record,
    SimilarPairReport, SimilarPairRow,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::EngineOutput;

/// Display options for report rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Maximum chars of text per row (0 = full text)
    pub text_max_len: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { text_max_len: 200 }
    }
}

/// Both reports of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub exact: ExactDuplicateReport,
    pub similar: SimilarPairReport,
}

impl Report {
    /// Assemble both reports; `records` must be the slice the engine ran on
    pub fn build(records: &[Record], output: &EngineOutput, options: ReportOptions) -> Self {
        Self {
            exact: exact_report(records, output, options),
            similar: similar_report(records, output, options),
        }
    }
}

/// One row per member of every exact-duplicate group, groups in id order
pub fn exact_report(
    records: &[Record],
    output: &EngineOutput,
    options: ReportOptions,
) -> ExactDuplicateReport {
    let max_len = options.text_max_len;
    let mut rows = Vec::with_capacity(output.stats.exact.grouped_records);

    for group in &output.exact_groups {
        for &position in &group.members {
            let record = &records[position];
            rows.push(ExactDuplicateRow {
                group_id: group.id,
                position: record.index,
                metadata: record.metadata.clone(),
                text: truncate_text(&record.text, max_len).into_owned(),
                normalized_text: truncate_text(&output.normalized[position], max_len)
                    .into_owned(),
                count_in_group: group.len(),
            });
        }
    }

    debug!("Assembled {} exact duplicate rows", rows.len());
    ExactDuplicateReport { rows }
}

/// One row per accepted pair, in acceptance order
pub fn similar_report(
    records: &[Record],
    output: &EngineOutput,
    options: ReportOptions,
) -> SimilarPairReport {
    let max_len = options.text_max_len;

    let rows: Vec<SimilarPairRow> = output
        .similar_pairs
        .iter()
        .map(|pair| {
            let a = &records[pair.first];
            let b = &records[pair.second];
            SimilarPairRow {
                position_a: a.index,
                position_b: b.index,
                similarity: format_score(pair.score),
                metadata_a: a.metadata.clone(),
                text_a: truncate_text(&a.text, max_len).into_owned(),
                metadata_b: b.metadata.clone(),
                text_b: truncate_text(&b.text, max_len).into_owned(),
            }
        })
        .collect();

    debug!("Assembled {} similar pair rows", rows.len());
    SimilarPairReport { rows }
}
