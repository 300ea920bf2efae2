//! Duplicate and near-duplicate text detection
//!
//! Records are normalized, grouped by identical normalized text, and sketched
//! into bottom-k signatures over char n-grams. Banded buckets of those
//! signatures yield candidate pairs, which a chain of cheap filters and an
//! edit-based similarity ratio turn into accepted near-duplicate pairs.
//!
//! ```no_run
//! use neardup_core::{EngineBuilder, Record, Report, ReportOptions};
//!
//! let records = vec![
//!     Record::new(0, "The quick brown fox jumps over the lazy dog"),
//!     Record::new(1, "The quick brown fox jumps over the lazy cat"),
//! ];
//! let engine = EngineBuilder::new().similarity_threshold(0.8).build()?;
//! let output = engine.run(&records);
//! let report = Report::build(&records, &output, ReportOptions::default());
//! print!("{}", report.similar.to_json_lines()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod band_index;
pub mod config;
pub mod error;
pub mod exact_dedup;
pub mod fuzzy_dedup;
pub mod hash;
pub mod minhash;
pub mod pipeline;
pub mod report;
pub mod similarity;

pub use band_index::{BandIndex, Bucket, BucketKey};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use exact_dedup::{ExactGroup, ExactGroupStats, ExactGrouper};
pub use fuzzy_dedup::{PairScorer, Rejection, ScoreStats, ScoredPair, ScorerConfig, Verdict};
pub use minhash::{Signature, Sketcher};
pub use pipeline::{DedupEngine, EngineBuilder, EngineOutput, PipelineStats};
pub use report::{Report, ReportOptions};
pub use similarity::similarity_ratio;

pub use neardup_filters::{normalize_text, TextNormalizer};
pub use neardup_formats::Record;
