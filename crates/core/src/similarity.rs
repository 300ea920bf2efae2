//! Edit-based similarity between normalized texts
//!
//! The ratio is the normalized Indel similarity: `2 * LCS / (|a| + |b|)`
//! over chars, where LCS is the length of the longest common subsequence.
//! It is 1.0 for identical texts and 0.0 for texts with no char in common.

/// Similarity ratio in `[0, 1]`
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * lcs_length(&a, &b) as f64 / total as f64
}

/// Longest common subsequence length
///
/// Shared prefix and suffix are matched directly; the remaining middle uses a
/// two-row DP over the shorter side.
pub fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[prefix..], &b[prefix..]);

    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return prefix + suffix;
    }

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for x in long {
        for (j, y) in short.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prefix + suffix + prev[short.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_identical() {
        assert_eq!(similarity_ratio("abc", "abc"), 1.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_lcs_length() {
        assert_eq!(lcs_length(&chars("kitten"), &chars("sitting")), 4);
        assert_eq!(lcs_length(&chars("ABCBDAB"), &chars("BDCABA")), 4);
        assert_eq!(lcs_length(&chars("abc"), &chars("abc")), 3);
        assert_eq!(lcs_length(&chars(""), &chars("abc")), 0);
        assert_eq!(lcs_length(&chars("prefix-mid-suffix"), &chars("prefix-MID-suffix")), 14);
    }

    #[test]
    fn test_ratio_values() {
        // 2 * 4 / 13
        assert!((similarity_ratio("kitten", "sitting") - 8.0 / 13.0).abs() < 1e-12);

        let ratio = similarity_ratio(
            "The quick brown fox jumps over the lazy dog",
            "The quick brown fox jumps over the lazy cat",
        );
        assert!((ratio - 80.0 / 86.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric() {
        let a = "この条例は市民の安全を確保する";
        let b = "この規則は市民の安心を確保する";
        assert_eq!(similarity_ratio(a, b), similarity_ratio(b, a));
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // One of two chars differs: LCS 1, ratio 2 * 1 / 4
        assert_eq!(similarity_ratio("条例", "条文"), 0.5);
    }
}
