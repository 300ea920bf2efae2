//! Engine configuration
//!
//! One typed structure, validated once when the engine is built. Partial
//! TOML or YAML documents fill the missing fields from the defaults.

use neardup_filters::LengthFilterConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Minimum similarity ratio for an accepted pair (0.0-1.0)
    pub similarity_threshold: f64,
    /// Normalized texts shorter than this are never scored
    pub min_length: usize,
    /// Maximum relative length difference of a scored pair (`None` or 0 = unlimited)
    pub length_delta: Option<f64>,
    /// Characters per n-gram
    pub ngram_size: usize,
    /// Values per signature
    pub signature_size: usize,
    /// Signature values per band
    pub band_size: usize,
    /// Width of a length class in chars (0 = one class for all lengths)
    pub length_bucket: usize,
    /// Buckets with more members are skipped (`None` or 0 = no limit)
    pub max_block_size: Option<usize>,
    /// Remove common CJK and ASCII punctuation during normalization
    pub strip_punctuation: bool,
    /// Also report pairs whose normalized texts are identical
    pub include_identical: bool,
    /// Run per-record and per-bucket work on rayon
    pub parallel: bool,
    /// Dedicated worker count (`None` = rayon's global pool)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.9,
            min_length: 20,
            length_delta: Some(0.3),
            ngram_size: 3,
            signature_size: 12,
            band_size: 4,
            length_bucket: 50,
            max_block_size: Some(2000),
            strip_punctuation: false,
            include_identical: false,
            parallel: true,
            num_threads: None,
        }
    }
}

impl EngineConfig {
    /// Check every constraint, returning the first violation
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::InvalidConfig(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        if self.ngram_size < 1 {
            return Err(Error::InvalidConfig("ngram_size must be at least 1".to_string()));
        }

        if self.signature_size < 1 {
            return Err(Error::InvalidConfig(
                "signature_size must be at least 1".to_string(),
            ));
        }

        if self.band_size < 1 {
            return Err(Error::InvalidConfig("band_size must be at least 1".to_string()));
        }

        if self.band_size > self.signature_size {
            return Err(Error::InvalidConfig(format!(
                "band_size ({}) must not exceed signature_size ({})",
                self.band_size, self.signature_size
            )));
        }

        if self.num_threads == Some(0) {
            return Err(Error::InvalidConfig("num_threads must be at least 1".to_string()));
        }

        self.length_filter().validate()?;

        debug!("Validated engine configuration: {:?}", self);
        Ok(())
    }

    /// Length rules used by the pair scorer
    pub fn length_filter(&self) -> LengthFilterConfig {
        LengthFilterConfig {
            min_length: self.min_length,
            length_delta: self.length_delta,
        }
    }

    /// Number of complete bands per signature
    pub fn num_bands(&self) -> usize {
        if self.band_size == 0 {
            0
        } else {
            self.signature_size / self.band_size
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}
