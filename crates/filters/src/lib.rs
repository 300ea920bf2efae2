//! Text filters for duplicate detection
//!
//! This crate provides the text normalization and length rules shared by
//! exact grouping and near-duplicate scoring.

pub mod error;
pub mod length_filter;
pub mod text_preprocessing;

pub use error::{Error, Result};
pub use length_filter::{relative_length_delta, LengthFilterConfig};
pub use text_preprocessing::{char_length, normalize_text, TextNormalizer};
