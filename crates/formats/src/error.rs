//! Error types for records and reports

use thiserror::Error;

/// Record and report errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record {0} is not a JSON object")]
    NotAnObject(usize),
}

/// Result type alias for format operations
pub type Result<T> = std::result::Result<T, Error>;
