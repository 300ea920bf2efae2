//! Text normalization for duplicate detection
//!
//! Canonicalizes raw text so that visually equivalent inputs compare equal:
//! compatibility normalization, unified line endings, collapsed whitespace
//! and, optionally, removal of common CJK and ASCII punctuation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use unicode_normalization::{is_nfkc_quick, IsNormalized, UnicodeNormalization};

/// Punctuation removed when `strip_punctuation` is enabled.
///
/// Full-width brackets are listed even though NFKC folds most of them to
/// their ASCII forms before this pattern runs.
pub const PUNCTUATION_CLASS: &str = r"[、。・,.;:!?「」『』（）()［］\[\]{}<>]";

static PUNCTUATION_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_punctuation_regex() -> &'static Regex {
    PUNCTUATION_REGEX.get_or_init(|| {
        Regex::new(PUNCTUATION_CLASS).expect("Failed to compile punctuation regex")
    })
}

fn get_whitespace_regex() -> &'static Regex {
    WHITESPACE_REGEX.get_or_init(|| {
        Regex::new(r"\s+").expect("Failed to compile whitespace regex")
    })
}

/// Text normalizer configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNormalizer {
    /// Remove the characters in [`PUNCTUATION_CLASS`]
    pub strip_punctuation: bool,
}

impl TextNormalizer {
    /// Create a normalizer
    pub fn new(strip_punctuation: bool) -> Self {
        Self { strip_punctuation }
    }

    /// Normalize text according to configuration
    ///
    /// Applies transformations in the following order:
    /// 1. NFKC normalization
    /// 2. `\r\n` and lone `\r` become `\n`
    /// 3. Punctuation removal (if enabled), followed by re-composition
    /// 4. Whitespace runs collapse to a single space, ends trimmed
    ///
    /// The result is a fixed point: normalizing it again returns it unchanged.
    pub fn normalize(&self, text: &str) -> String {
        let mut buffer = String::with_capacity(text.len());
        self.normalize_into(text, &mut buffer);
        buffer
    }

    /// Normalize text into an existing buffer
    pub fn normalize_into(&self, text: &str, buffer: &mut String) {
        buffer.clear();
        if text.is_empty() {
            return;
        }

        let mut result: String = match is_nfkc_quick(text.chars()) {
            IsNormalized::Yes => text.to_string(),
            _ => text.nfkc().collect(),
        };

        if result.contains('\r') {
            result = result.replace("\r\n", "\n").replace('\r', "\n");
        }

        if self.strip_punctuation {
            let regex = get_punctuation_regex();
            if regex.is_match(&result) {
                let stripped = regex.replace_all(&result, "");
                // Removing a mark can bring a base character next to a
                // combining sequence it now composes with.
                result = stripped.nfkc().collect();
            }
        }

        let regex = get_whitespace_regex();
        buffer.push_str(regex.replace_all(&result, " ").trim());
    }
}

/// Normalize `text` with a one-off normalizer
pub fn normalize_text(text: &str, strip_punctuation: bool) -> String {
    TextNormalizer::new(strip_punctuation).normalize(text)
}

/// Count the characters of normalized text, the unit every length rule uses
pub fn char_length(text: &str) -> usize {
    text.chars().count()
}
