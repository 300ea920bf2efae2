//! Bottom-k sketches for near-duplicate candidate generation
//!
//! A signature holds the `k` smallest distinct hashes of a text's character
//! n-grams. Two texts sharing most of their n-grams are likely to share their
//! smallest hashes too, so equal signature slices approximate high Jaccard
//! similarity of the n-gram sets.
//!
//! This is a single-hash bottom-k sketch, not k-independent MinHash: the
//! values are sorted ascending, and band `b` of a signature covers ranks
//! `b*rows..(b+1)*rows` of the bottom-k list.

use tracing::debug;

use crate::hash::hash_text;

/// Fixed-size fingerprint of a normalized text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Signature values, ascending unless produced by cyclic fill
    pub values: Vec<u32>,
}

impl Signature {
    /// Create a new signature
    pub fn new(values: Vec<u32>) -> Self {
        Self { values }
    }

    /// Number of values (`k`)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the signature has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values `offset..offset + band_size`, or `None` for a partial band
    pub fn band(&self, offset: usize, band_size: usize) -> Option<&[u32]> {
        self.values.get(offset..offset.checked_add(band_size)?)
    }
}

/// Computes bottom-k signatures over character n-grams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sketcher {
    /// Characters per n-gram
    ngram_size: usize,
    /// Values per signature (`k`)
    signature_size: usize,
}

impl Sketcher {
    /// Create a sketcher
    ///
    /// # Arguments
    /// * `ngram_size` - Characters per n-gram (typically 3), at least 1
    /// * `signature_size` - Values per signature (typically 12), at least 1
    ///
    /// Both are validated by `EngineConfig`; zero is clamped to one here so the
    /// sketcher itself stays total.
    pub fn new(ngram_size: usize, signature_size: usize) -> Self {
        Self {
            ngram_size: ngram_size.max(1),
            signature_size: signature_size.max(1),
        }
    }

    /// Compute the signature of normalized text
    pub fn signature(&self, text: &str) -> Signature {
        if text.is_empty() {
            return Signature::new(vec![0u32; self.signature_size]);
        }

        if text.is_ascii() {
            return self.signature_ascii(text);
        }
        self.signature_utf8(text)
    }

    /// Fast path for ASCII text: every byte is a char
    fn signature_ascii(&self, text: &str) -> Signature {
        let bytes = text.as_bytes();
        if bytes.len() < self.ngram_size {
            return self.repeat_single(hash_text(text));
        }

        let hashes = bytes
            .windows(self.ngram_size)
            .map(adler2::adler32_slice)
            .collect();

        self.bottom_k(hashes)
    }

    /// Text with multi-byte chars: slice n-grams at char boundaries
    fn signature_utf8(&self, text: &str) -> Signature {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let char_count = boundaries.len();
        boundaries.push(text.len());

        if char_count < self.ngram_size {
            return self.repeat_single(hash_text(text));
        }

        let hashes = (0..=char_count - self.ngram_size)
            .map(|i| hash_text(&text[boundaries[i]..boundaries[i + self.ngram_size]]))
            .collect();

        self.bottom_k(hashes)
    }

    /// Keep the `k` smallest distinct hashes, cycling when fewer exist
    fn bottom_k(&self, mut hashes: Vec<u32>) -> Signature {
        hashes.sort_unstable();
        hashes.dedup();

        debug!("Sketching {} distinct n-gram hashes", hashes.len());

        if hashes.len() >= self.signature_size {
            hashes.truncate(self.signature_size);
            return Signature::new(hashes);
        }

        let values = hashes
            .iter()
            .copied()
            .cycle()
            .take(self.signature_size)
            .collect();
        Signature::new(values)
    }

    fn repeat_single(&self, hash: u32) -> Signature {
        Signature::new(vec![hash; self.signature_size])
    }
}

/// Compute a signature with a one-off sketcher
pub fn signature(text: &str, ngram_size: usize, signature_size: usize) -> Signature {
    Sketcher::new(ngram_size, signature_size).signature(text)
}
