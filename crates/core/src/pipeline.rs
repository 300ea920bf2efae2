//! Duplicate detection pipeline
//!
//! Orchestrates normalization, exact grouping, sketching, banding and pair
//! scoring over an in-memory batch of records. Per-record stages run on
//! Rayon when `parallel` is set; every stage keeps input order, so parallel
//! and sequential runs produce identical output.

use neardup_filters::{char_length, TextNormalizer};
use neardup_formats::Record;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::band_index::BandIndex;
use crate::config::EngineConfig;
use crate::exact_dedup::{ExactGroup, ExactGroupStats, ExactGrouper};
use crate::fuzzy_dedup::{PairScorer, ScoreStats, ScoredPair, ScorerConfig};
use crate::minhash::{Signature, Sketcher};
use crate::Result;

/// Pipeline statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub total_records: usize,
    /// Records whose normalized text is empty
    pub empty_records: usize,
    pub exact: ExactGroupStats,
    pub scoring: ScoreStats,
}

impl PipelineStats {
    /// Similarity ratios computed
    pub fn comparisons(&self) -> usize {
        self.scoring.comparisons()
    }

    /// Accepted near-duplicate pairs
    pub fn similar_pairs(&self) -> usize {
        self.scoring.accepted
    }
}

/// Result of one engine run
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    /// Normalized text per record position
    pub normalized: Vec<String>,
    /// Exact-duplicate groups
    pub exact_groups: Vec<ExactGroup>,
    /// Accepted near-duplicate pairs
    pub similar_pairs: Vec<ScoredPair>,
    pub stats: PipelineStats,
}

/// Duplicate and near-duplicate detection engine
pub struct DedupEngine {
    config: EngineConfig,
    normalizer: TextNormalizer,
    sketcher: Sketcher,
    pool: Option<rayon::ThreadPool>,
}

impl DedupEngine {
    /// Create an engine; fails on an invalid configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let pool = match config.num_threads {
            Some(threads) if config.parallel => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("neardup-{}", i))
                    .build()?,
            ),
            _ => None,
        };

        info!(
            "Created DedupEngine: threshold {}, {}-grams, {} values in {} bands, parallel={}",
            config.similarity_threshold,
            config.ngram_size,
            config.signature_size,
            config.num_bands(),
            config.parallel
        );

        Ok(Self {
            normalizer: TextNormalizer::new(config.strip_punctuation),
            sketcher: Sketcher::new(config.ngram_size, config.signature_size),
            config,
            pool,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over `records`
    pub fn run(&self, records: &[Record]) -> EngineOutput {
        match &self.pool {
            Some(pool) => pool.install(|| self.run_stages(records)),
            None => self.run_stages(records),
        }
    }

    /// Run over bare texts, positions standing in for record indices
    pub fn run_texts<S: AsRef<str>>(&self, texts: &[S]) -> EngineOutput {
        let records: Vec<Record> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Record::new(i, t.as_ref()))
            .collect();
        self.run(&records)
    }

    fn run_stages(&self, records: &[Record]) -> EngineOutput {
        info!("Processing {} records", records.len());

        let normalized = self.normalize_all(records);
        let lengths: Vec<usize> = normalized.iter().map(|t| char_length(t)).collect();
        let empty_records = lengths.iter().filter(|&&len| len == 0).count();
        debug!("{} records normalized to empty text", empty_records);

        let mut grouper = ExactGrouper::new();
        let exact_groups = grouper.group(&normalized);

        let signatures = self.sketch_all(&normalized);
        let index = if self.config.parallel {
            BandIndex::build_parallel(
                &signatures,
                &lengths,
                self.config.band_size,
                self.config.length_bucket,
            )
        } else {
            BandIndex::build(
                &signatures,
                &lengths,
                self.config.band_size,
                self.config.length_bucket,
            )
        };

        let mut scorer = PairScorer::new(ScorerConfig::from(&self.config), &normalized, &lengths);
        let similar_pairs = if self.config.parallel {
            scorer.score_parallel(&index)
        } else {
            scorer.score(&index)
        };

        let stats = PipelineStats {
            total_records: records.len(),
            empty_records,
            exact: grouper.stats().clone(),
            scoring: scorer.stats().clone(),
        };

        info!(
            "Finished: {} exact groups, {} comparisons, {} similar pairs",
            exact_groups.len(),
            stats.comparisons(),
            similar_pairs.len()
        );

        EngineOutput {
            normalized,
            exact_groups,
            similar_pairs,
            stats,
        }
    }

    fn normalize_all(&self, records: &[Record]) -> Vec<String> {
        if self.config.parallel {
            records
                .par_iter()
                .map(|r| self.normalizer.normalize(&r.text))
                .collect()
        } else {
            records
                .iter()
                .map(|r| self.normalizer.normalize(&r.text))
                .collect()
        }
    }

    fn sketch_all(&self, normalized: &[String]) -> Vec<Signature> {
        if self.config.parallel {
            normalized
                .par_iter()
                .map(|t| self.sketcher.signature(t))
                .collect()
        } else {
            normalized.iter().map(|t| self.sketcher.signature(t)).collect()
        }
    }
}

/// Builder for engine configuration
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.config.min_length = length;
        self
    }

    pub fn length_delta(mut self, delta: Option<f64>) -> Self {
        self.config.length_delta = delta;
        self
    }

    pub fn ngram_size(mut self, size: usize) -> Self {
        self.config.ngram_size = size;
        self
    }

    pub fn signature_size(mut self, size: usize) -> Self {
        self.config.signature_size = size;
        self
    }

    pub fn band_size(mut self, size: usize) -> Self {
        self.config.band_size = size;
        self
    }

    pub fn length_bucket(mut self, width: usize) -> Self {
        self.config.length_bucket = width;
        self
    }

    pub fn max_block_size(mut self, limit: Option<usize>) -> Self {
        self.config.max_block_size = limit;
        self
    }

    pub fn strip_punctuation(mut self, strip: bool) -> Self {
        self.config.strip_punctuation = strip;
        self
    }

    pub fn include_identical(mut self, include: bool) -> Self {
        self.config.include_identical = include;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = Some(threads);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn build(self) -> Result<DedupEngine> {
        DedupEngine::new(self.config)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
