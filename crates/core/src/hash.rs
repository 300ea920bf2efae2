//! Hashing utilities for sketching and pair bookkeeping

/// Fixed 32-bit checksum of a text's UTF-8 bytes (Adler-32)
///
/// Unseeded and platform independent, so signatures are reproducible across
/// runs and machines.
pub fn hash_text(s: &str) -> u32 {
    adler2::adler32_slice(s.as_bytes())
}

/// Canonical id of an unordered pair of record positions
pub fn pair_id(a: usize, b: usize) -> u64 {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    ((lo as u64) << 32) | hi as u64
}
