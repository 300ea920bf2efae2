//! Record and report types for duplicate detection
//!
//! Records are the engine's input; report rows are its serializable output.
//! Nothing here touches the filesystem: rows render to strings and the
//! caller decides where they go.

pub mod error;
pub mod record;
pub mod report;

pub use error::{Error, Result};
pub use record::Record;
pub use report::{
    format_score, truncate_text, ExactDuplicateReport, ExactDuplicateRow, SimilarPairReport,
    SimilarPairRow, TRUNCATION_MARKER,
};
