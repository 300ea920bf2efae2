//! Exact duplicate grouping over normalized text
//!
//! Records whose normalized text is identical form a group. Empty normalized
//! text never groups: a record with nothing left after normalization is not a
//! duplicate of anything.

use ahash::AHashMap;
use tracing::{debug, info};

/// Statistics for exact grouping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactGroupStats {
    /// Total number of records seen
    pub total_seen: usize,
    /// Records skipped because their normalized text was empty
    pub empty_skipped: usize,
    /// Number of groups with at least two members
    pub groups: usize,
    /// Records belonging to some group
    pub grouped_records: usize,
}

impl ExactGroupStats {
    /// Records beyond the first of each group, as a percentage of all records
    pub fn dedup_rate(&self) -> f64 {
        if self.total_seen == 0 {
            0.0
        } else {
            ((self.grouped_records - self.groups) as f64 / self.total_seen as f64) * 100.0
        }
    }
}

/// Records sharing one normalized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactGroup {
    /// Sequential id, starting at 1, in order of first encounter
    pub id: usize,
    /// Record positions in input order
    pub members: Vec<usize>,
}

impl ExactGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Groups record positions by identical normalized text
#[derive(Debug, Default)]
pub struct ExactGrouper {
    stats: ExactGroupStats,
}

impl ExactGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `normalized` texts, indexed by record position
    ///
    /// Only groups of two or more members are returned.
    pub fn group<S: AsRef<str>>(&mut self, normalized: &[S]) -> Vec<ExactGroup> {
        let mut slots: AHashMap<&str, usize> = AHashMap::with_capacity(normalized.len());
        let mut candidates: Vec<Vec<usize>> = Vec::new();
        let mut stats = ExactGroupStats {
            total_seen: normalized.len(),
            ..Default::default()
        };

        for (position, text) in normalized.iter().enumerate() {
            let text = text.as_ref();
            if text.is_empty() {
                stats.empty_skipped += 1;
                continue;
            }

            let slot = *slots.entry(text).or_insert_with(|| {
                candidates.push(Vec::new());
                candidates.len() - 1
            });
            candidates[slot].push(position);
        }

        let groups: Vec<ExactGroup> = candidates
            .into_iter()
            .filter(|members| members.len() >= 2)
            .enumerate()
            .map(|(i, members)| ExactGroup { id: i + 1, members })
            .collect();

        stats.groups = groups.len();
        stats.grouped_records = groups.iter().map(ExactGroup::len).sum();

        debug!(
            "Exact grouping skipped {} empty records across {} distinct texts",
            stats.empty_skipped,
            slots.len()
        );
        info!(
            "Found {} exact duplicate groups covering {} records",
            stats.groups, stats.grouped_records
        );

        self.stats = stats;
        groups
    }

    /// Statistics of the last `group` call
    pub fn stats(&self) -> &ExactGroupStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(texts: &[&str]) -> Vec<ExactGroup> {
        ExactGrouper::new().group(texts)
    }

    #[test]
    fn test_groups_identical_texts() {
        let groups = group(&["hello", "world", "hello"]);
        assert_eq!(
            groups,
            vec![ExactGroup {
                id: 1,
                members: vec![0, 2]
            }]
        );
    }

    #[test]
    fn test_singletons_excluded() {
        assert!(group(&["a", "b", "c"]).is_empty());
    }

    #[test]
    fn test_empty_text_never_groups() {
        assert!(group(&["", "", ""]).is_empty());

        let mut grouper = ExactGrouper::new();
        grouper.group(&["", "x", ""]);
        assert_eq!(grouper.stats().empty_skipped, 2);
        assert_eq!(grouper.stats().groups, 0);
    }

    #[test]
    fn test_ids_follow_first_encounter() {
        // "b" is seen first, so its group gets id 1 even though "a" is
        // completed earlier.
        let groups = group(&["b", "a", "a", "c", "b", "c", "c"]);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].id, 1);
        assert_eq!(groups[0].members, vec![0, 4]);
        assert_eq!(groups[1].id, 2);
        assert_eq!(groups[1].members, vec![1, 2]);
        assert_eq!(groups[2].id, 3);
        assert_eq!(groups[2].members, vec![3, 5, 6]);
    }

    #[test]
    fn test_ids_skip_singletons() {
        let groups = group(&["solo", "pair", "pair"]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, 1);
    }

    #[test]
    fn test_stats() {
        let mut grouper = ExactGrouper::new();
        grouper.group(&["a", "a", "a", "b", "b", "c", ""]);

        let stats = grouper.stats();
        assert_eq!(stats.total_seen, 7);
        assert_eq!(stats.groups, 2);
        assert_eq!(stats.grouped_records, 5);
        assert_eq!(stats.empty_skipped, 1);
        assert!((stats.dedup_rate() - 300.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_owned_strings() {
        let texts = vec!["x".to_string(), "x".to_string()];
        let groups = ExactGrouper::new().group(&texts);
        assert_eq!(groups[0].members, vec![0, 1]);
    }

    #[test]
    fn test_large_scale() {
        let texts: Vec<String> = (0..20_000).map(|i| format!("doc_{}", i % 10_000)).collect();
        let mut grouper = ExactGrouper::new();
        let groups = grouper.group(&texts);

        assert_eq!(groups.len(), 10_000);
        assert!(groups.iter().all(|g| g.members.len() == 2));
        assert_eq!(grouper.stats().dedup_rate(), 50.0);
    }
}
