//! Error types for the duplicate detection engine

use thiserror::Error;

/// Core engine errors
///
/// Every variant is raised before any record is processed: per-record work
/// (normalization, sketching, scoring) is total over arbitrary text.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl From<neardup_filters::Error> for Error {
    fn from(err: neardup_filters::Error) -> Self {
        match err {
            neardup_filters::Error::InvalidConfig(msg) => Error::InvalidConfig(msg),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
