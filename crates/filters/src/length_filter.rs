//! Length-based rules for candidate pairs
//!
//! Lengths are character counts of normalized text.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Filter configuration for length-based filtering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthFilterConfig {
    /// Texts shorter than this never take part in similarity scoring
    pub min_length: usize,
    /// Maximum relative length difference of a pair (`None` or 0 = unlimited)
    pub length_delta: Option<f64>,
}

impl Default for LengthFilterConfig {
    fn default() -> Self {
        Self {
            min_length: 20,
            length_delta: Some(0.3),
        }
    }
}

impl LengthFilterConfig {
    /// Reject negative or non-finite deltas
    pub fn validate(&self) -> Result<()> {
        match self.length_delta {
            Some(delta) if !delta.is_finite() || delta < 0.0 => Err(Error::InvalidConfig(format!(
                "length_delta must be a finite value >= 0, got {}",
                delta
            ))),
            _ => Ok(()),
        }
    }

    /// Check whether a text of `length` chars is long enough to score
    pub fn passes_min_length(&self, length: usize) -> bool {
        length >= self.min_length
    }

    /// Check whether two lengths are close enough to be worth comparing
    pub fn passes_length_delta(&self, len_a: usize, len_b: usize) -> bool {
        match self.active_length_delta() {
            Some(limit) => relative_length_delta(len_a, len_b) <= limit,
            None => true,
        }
    }

    /// The delta limit in force; a zero limit disables the rule
    pub fn active_length_delta(&self) -> Option<f64> {
        self.length_delta.filter(|&limit| limit > 0.0)
    }
}

/// `|a - b| / max(a, b)`, or 0.0 when both lengths are zero
pub fn relative_length_delta(len_a: usize, len_b: usize) -> f64 {
    let len_max = len_a.max(len_b);
    if len_max == 0 {
        return 0.0;
    }
    len_a.abs_diff(len_b) as f64 / len_max as f64
}
