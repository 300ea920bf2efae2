//! Near-duplicate pair scoring over band index buckets
//!
//! Every bucket of the band index yields candidate pairs. Each pair runs
//! through an ordered chain of guards, and the first one that fires is
//! credited with the rejection:
//!
//! 1. either text shorter than `min_length`
//! 2. pair already scored in this run
//! 3. identical normalized texts (unless `include_identical`)
//! 4. relative length difference above `length_delta`
//! 5. similarity ratio below `similarity_threshold`
//!
//! Pairs surviving all five are accepted. Output follows bucket order, then
//! pair order within the bucket.

use ahash::AHashSet;
use neardup_filters::LengthFilterConfig;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::band_index::BandIndex;
use crate::config::EngineConfig;
use crate::hash::pair_id;
use crate::similarity::similarity_ratio;

/// An accepted near-duplicate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    /// Smaller record position
    pub first: usize,
    /// Larger record position
    pub second: usize,
    /// Similarity ratio in `[0, 1]`
    pub score: f64,
}

/// Why a candidate pair was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MinLength,
    AlreadyScored,
    Identical,
    LengthDelta,
    BelowThreshold,
}

/// Outcome of one pair past the min-length and already-scored guards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Accepted(f64),
    Rejected(Rejection),
}

/// Statistics for pair scoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreStats {
    /// Buckets in the index
    pub buckets_total: usize,
    /// Buckets with a single member
    pub buckets_singleton: usize,
    /// Buckets skipped for exceeding `max_block_size`
    pub buckets_oversized: usize,
    pub rejected_min_length: usize,
    pub rejected_already_scored: usize,
    pub rejected_identical: usize,
    pub rejected_length_delta: usize,
    pub rejected_threshold: usize,
    /// Pairs accepted
    pub accepted: usize,
}

impl ScoreStats {
    /// Similarity ratios computed (accepted or below threshold)
    pub fn comparisons(&self) -> usize {
        self.accepted + self.rejected_threshold
    }

    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Accepted(_) => self.accepted += 1,
            Verdict::Rejected(Rejection::MinLength) => self.rejected_min_length += 1,
            Verdict::Rejected(Rejection::AlreadyScored) => self.rejected_already_scored += 1,
            Verdict::Rejected(Rejection::Identical) => self.rejected_identical += 1,
            Verdict::Rejected(Rejection::LengthDelta) => self.rejected_length_delta += 1,
            Verdict::Rejected(Rejection::BelowThreshold) => self.rejected_threshold += 1,
        }
    }
}

/// Distinct pairs scored per parallel batch
const PAIR_BATCH: usize = 1 << 16;

/// Scoring configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerConfig {
    pub similarity_threshold: f64,
    pub length_filter: LengthFilterConfig,
    pub max_block_size: Option<usize>,
    pub include_identical: bool,
}

impl From<&EngineConfig> for ScorerConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            similarity_threshold: config.similarity_threshold,
            length_filter: config.length_filter(),
            max_block_size: config.max_block_size,
            include_identical: config.include_identical,
        }
    }
}

/// Scores candidate pairs from a band index
pub struct PairScorer<'a> {
    config: ScorerConfig,
    /// Normalized text per record position
    texts: &'a [String],
    /// Normalized char length per record position
    lengths: &'a [usize],
    stats: ScoreStats,
}

impl<'a> PairScorer<'a> {
    /// Create a scorer over normalized texts and their char lengths
    pub fn new(config: ScorerConfig, texts: &'a [String], lengths: &'a [usize]) -> Self {
        debug_assert_eq!(texts.len(), lengths.len());
        Self {
            config,
            texts,
            lengths,
            stats: ScoreStats::default(),
        }
    }

    /// Guards 3-5 for a pair that passed min-length and deduplication
    pub fn evaluate(&self, a: usize, b: usize) -> Verdict {
        if !self.config.include_identical && self.texts[a] == self.texts[b] {
            return Verdict::Rejected(Rejection::Identical);
        }

        if !self
            .config
            .length_filter
            .passes_length_delta(self.lengths[a], self.lengths[b])
        {
            return Verdict::Rejected(Rejection::LengthDelta);
        }

        let score = similarity_ratio(&self.texts[a], &self.texts[b]);
        if score < self.config.similarity_threshold {
            return Verdict::Rejected(Rejection::BelowThreshold);
        }

        Verdict::Accepted(score)
    }

    /// Score every bucket sequentially
    pub fn score(&mut self, index: &BandIndex) -> Vec<ScoredPair> {
        let mut seen: AHashSet<u64> = AHashSet::new();
        let mut accepted = Vec::new();

        for members in self.scorable_buckets(index) {
            let mut visited = Vec::new();
            let skips = self.for_each_eligible_pair(members, |a, b| visited.push((a, b)));
            self.stats.rejected_min_length += skips;

            for (a, b) in visited {
                if !seen.insert(pair_id(a, b)) {
                    self.stats.record(Verdict::Rejected(Rejection::AlreadyScored));
                    continue;
                }
                let verdict = self.evaluate(a, b);
                self.stats.record(verdict);
                if let Verdict::Accepted(score) = verdict {
                    accepted.push(ScoredPair { first: a, second: b, score });
                }
            }
        }

        self.log_summary(accepted.len());
        accepted
    }

    /// Score buckets with similarity ratios computed in parallel
    ///
    /// Buckets are walked in order and each pair is deduplicated before it is
    /// scored, so every distinct pair is evaluated once. Distinct pairs are
    /// scored in parallel batches and recorded in walk order, which gives the
    /// same pairs, order and statistics as [`Self::score`].
    pub fn score_parallel(&mut self, index: &BandIndex) -> Vec<ScoredPair> {
        let buckets = self.scorable_buckets(index);
        let mut seen: AHashSet<u64> = AHashSet::new();
        let mut batch: Vec<(usize, usize)> = Vec::with_capacity(PAIR_BATCH);
        let mut accepted = Vec::new();

        for members in buckets {
            let mut already_scored = 0;
            let skips = self.for_each_eligible_pair(members, |a, b| {
                if seen.insert(pair_id(a, b)) {
                    batch.push((a, b));
                } else {
                    already_scored += 1;
                }
            });
            self.stats.rejected_min_length += skips;
            self.stats.rejected_already_scored += already_scored;

            if batch.len() >= PAIR_BATCH {
                self.score_batch(&mut batch, &mut accepted);
            }
        }
        self.score_batch(&mut batch, &mut accepted);

        self.log_summary(accepted.len());
        accepted
    }

    /// Evaluate a batch of distinct pairs in parallel and drain it
    fn score_batch(&mut self, batch: &mut Vec<(usize, usize)>, accepted: &mut Vec<ScoredPair>) {
        if batch.is_empty() {
            return;
        }

        let this = &*self;
        let verdicts: Vec<Verdict> = batch
            .par_iter()
            .map(|&(a, b)| this.evaluate(a, b))
            .collect();
        debug!("Scored batch of {} distinct pairs", batch.len());

        for (&(a, b), verdict) in batch.iter().zip(verdicts) {
            self.stats.record(verdict);
            if let Verdict::Accepted(score) = verdict {
                accepted.push(ScoredPair { first: a, second: b, score });
            }
        }
        batch.clear();
    }

    /// Member lists of buckets worth scoring; counts the ones skipped
    fn scorable_buckets<'i>(&mut self, index: &'i BandIndex) -> Vec<&'i [usize]> {
        self.stats = ScoreStats {
            buckets_total: index.len(),
            ..Default::default()
        };

        let mut scorable = Vec::new();
        for bucket in index.buckets() {
            let size = bucket.members.len();
            if size < 2 {
                self.stats.buckets_singleton += 1;
                continue;
            }
            if let Some(limit) = self.config.max_block_size.filter(|&limit| limit > 0) {
                if size > limit {
                    self.stats.buckets_oversized += 1;
                    warn!(
                        "Skipping bucket at band offset {} (length class {}) with {} members, limit is {}",
                        bucket.key.offset, bucket.key.length_class, size, limit
                    );
                    continue;
                }
            }
            scorable.push(bucket.members.as_slice());
        }

        debug!(
            "{} of {} buckets have candidate pairs",
            scorable.len(),
            index.len()
        );
        scorable
    }

    /// Visit pairs `(members[i], members[j])`, `i < j`, whose texts both meet
    /// `min_length`; returns the number of pairs skipped for length
    fn for_each_eligible_pair(&self, members: &[usize], mut visit: impl FnMut(usize, usize)) -> usize {
        let filter = &self.config.length_filter;
        let mut skipped = 0;

        for (i, &a) in members.iter().enumerate() {
            let rest = &members[i + 1..];
            if !filter.passes_min_length(self.lengths[a]) {
                skipped += rest.len();
                continue;
            }
            for &b in rest {
                if !filter.passes_min_length(self.lengths[b]) {
                    skipped += 1;
                    continue;
                }
                visit(a, b);
            }
        }

        skipped
    }

    fn log_summary(&self, accepted: usize) {
        info!(
            "Similarity comparisons: {}, matches: {}",
            self.stats.comparisons(),
            accepted
        );
        debug!("Pair scoring statistics: {:?}", self.stats);
    }

    /// Statistics of the last scoring pass
    pub fn stats(&self) -> &ScoreStats {
        &self.stats
    }
}
