//! Banded bucket index for candidate generation
//!
//! Each signature is cut into non-overlapping bands of `band_size` values.
//! A record lands in one bucket per complete band, keyed by its length class,
//! the band offset and the band values. Two records become candidates when
//! they share any bucket ("OR of bands").
//!
//! Buckets keep the order in which they were first created and list members
//! in input order, so iterating the index is deterministic.

use ahash::AHashMap;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::minhash::Signature;

/// Records per shard when building in parallel
const SHARD_SIZE: usize = 4096;

/// Key of one bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    /// `length / length_bucket`, or 0 when length bucketing is disabled
    pub length_class: usize,
    /// Offset of the band within the signature
    pub offset: usize,
    /// Signature values of the band
    pub band: Box<[u32]>,
}

/// Records sharing one bucket key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: BucketKey,
    /// Record positions in input order
    pub members: Vec<usize>,
}

/// Length class of a normalized text
pub fn length_class(length: usize, length_bucket: usize) -> usize {
    if length_bucket == 0 {
        0
    } else {
        length / length_bucket
    }
}

/// Bucket index over record signatures
#[derive(Debug, Clone, Default)]
pub struct BandIndex {
    /// Buckets in order of first creation
    buckets: Vec<Bucket>,
    /// Bucket key to position in `buckets`
    slots: AHashMap<BucketKey, usize>,
}

impl BandIndex {
    /// Build the index sequentially
    ///
    /// # Arguments
    /// * `signatures` - One signature per record position
    /// * `lengths` - Normalized char length per record position
    /// * `band_size` - Values per band, at least 1
    /// * `length_bucket` - Length class width (0 disables length bucketing)
    pub fn build(
        signatures: &[Signature],
        lengths: &[usize],
        band_size: usize,
        length_bucket: usize,
    ) -> Self {
        let mut index = Self::default();
        index.insert_range(0, signatures, lengths, band_size, length_bucket);
        index.log_summary();
        index
    }

    /// Build the index from shards in parallel
    ///
    /// Shards are merged in shard order, which yields exactly the buckets,
    /// bucket order and member order of [`BandIndex::build`].
    pub fn build_parallel(
        signatures: &[Signature],
        lengths: &[usize],
        band_size: usize,
        length_bucket: usize,
    ) -> Self {
        let shards: Vec<BandIndex> = signatures
            .par_chunks(SHARD_SIZE)
            .zip(lengths.par_chunks(SHARD_SIZE))
            .enumerate()
            .map(|(shard, (sigs, lens))| {
                let mut index = Self::default();
                index.insert_range(shard * SHARD_SIZE, sigs, lens, band_size, length_bucket);
                index
            })
            .collect();

        let mut merged = Self::default();
        for shard in shards {
            merged.merge(shard);
        }
        merged.log_summary();
        merged
    }

    fn insert_range(
        &mut self,
        first_position: usize,
        signatures: &[Signature],
        lengths: &[usize],
        band_size: usize,
        length_bucket: usize,
    ) {
        let band_size = band_size.max(1);

        for (i, (signature, &length)) in signatures.iter().zip(lengths).enumerate() {
            let position = first_position + i;
            let class = length_class(length, length_bucket);

            let mut offset = 0;
            while let Some(band) = signature.band(offset, band_size) {
                let key = BucketKey {
                    length_class: class,
                    offset,
                    band: band.into(),
                };
                self.push(key, position);
                offset += band_size;
            }
        }
    }

    fn push(&mut self, key: BucketKey, position: usize) {
        match self.slots.get(&key) {
            Some(&slot) => self.buckets[slot].members.push(position),
            None => {
                self.slots.insert(key.clone(), self.buckets.len());
                self.buckets.push(Bucket {
                    key,
                    members: vec![position],
                });
            }
        }
    }

    /// Append a shard built over later record positions
    fn merge(&mut self, shard: BandIndex) {
        for bucket in shard.buckets {
            match self.slots.get(&bucket.key) {
                Some(&slot) => self.buckets[slot].members.extend(bucket.members),
                None => {
                    self.slots.insert(bucket.key.clone(), self.buckets.len());
                    self.buckets.push(bucket);
                }
            }
        }
    }

    fn log_summary(&self) {
        let largest = self.buckets.iter().map(|b| b.members.len()).max().unwrap_or(0);
        let shared = self.buckets.iter().filter(|b| b.members.len() > 1).count();
        info!(
            "Built band index with {} buckets ({} shared, largest {})",
            self.buckets.len(),
            shared,
            largest
        );
        debug!("Band index key table holds {} entries", self.slots.len());
    }

    /// Buckets in creation order
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Members of the bucket with `key`
    pub fn get(&self, key: &BucketKey) -> Option<&[usize]> {
        self.slots
            .get(key)
            .map(|&slot| self.buckets[slot].members.as_slice())
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minhash::Sketcher;

    fn sig(values: &[u32]) -> Signature {
        Signature::new(values.to_vec())
    }

    #[test]
    fn test_length_class() {
        assert_eq!(length_class(49, 50), 0);
        assert_eq!(length_class(50, 50), 1);
        assert_eq!(length_class(1000, 0), 0);
    }

    #[test]
    fn test_one_bucket_per_complete_band() {
        let index = BandIndex::build(&[sig(&[1, 2, 3, 4, 5])], &[10], 2, 50);

        // Bands at offsets 0 and 2; the trailing value is discarded
        assert_eq!(index.len(), 2);
        assert_eq!(index.buckets()[0].key.offset, 0);
        assert_eq!(&*index.buckets()[0].key.band, &[1, 2]);
        assert_eq!(index.buckets()[1].key.offset, 2);
        assert_eq!(&*index.buckets()[1].key.band, &[3, 4]);
    }

    #[test]
    fn test_shared_band_forms_bucket() {
        let signatures = vec![sig(&[1, 2, 3, 4]), sig(&[9, 9, 3, 4]), sig(&[1, 2, 7, 7])];
        let index = BandIndex::build(&signatures, &[10, 10, 10], 2, 50);

        let first_band = BucketKey {
            length_class: 0,
            offset: 0,
            band: vec![1, 2].into(),
        };
        let second_band = BucketKey {
            length_class: 0,
            offset: 2,
            band: vec![3, 4].into(),
        };
        assert_eq!(index.get(&first_band), Some(&[0, 2][..]));
        assert_eq!(index.get(&second_band), Some(&[0, 1][..]));
    }

    #[test]
    fn test_offset_is_part_of_key() {
        // Same values at different offsets must not collide
        let signatures = vec![sig(&[5, 5, 6, 6]), sig(&[6, 6, 5, 5])];
        let index = BandIndex::build(&signatures, &[10, 10], 2, 50);
        assert_eq!(index.len(), 4);
        assert!(index.buckets().iter().all(|b| b.members.len() == 1));
    }

    #[test]
    fn test_length_classes_separate_buckets() {
        let signatures = vec![sig(&[1, 2]), sig(&[1, 2]), sig(&[1, 2])];
        let index = BandIndex::build(&signatures, &[10, 40, 60], 2, 50);

        assert_eq!(index.len(), 2);
        assert_eq!(index.buckets()[0].members, vec![0, 1]);
        assert_eq!(index.buckets()[1].members, vec![2]);

        let unbucketed = BandIndex::build(&signatures, &[10, 40, 60], 2, 0);
        assert_eq!(unbucketed.len(), 1);
        assert_eq!(unbucketed.buckets()[0].members, vec![0, 1, 2]);
    }

    #[test]
    fn test_band_larger_than_signature() {
        let index = BandIndex::build(&[sig(&[1, 2, 3])], &[3], 4, 50);
        assert!(index.is_empty());
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let sketcher = Sketcher::new(3, 12);
        let texts: Vec<String> = (0..10_000)
            .map(|i| format!("record {} about topic {}", i % 37, i % 11))
            .collect();
        let signatures: Vec<Signature> = texts.iter().map(|t| sketcher.signature(t)).collect();
        let lengths: Vec<usize> = texts.iter().map(|t| t.chars().count()).collect();

        let sequential = BandIndex::build(&signatures, &lengths, 4, 10);
        let parallel = BandIndex::build_parallel(&signatures, &lengths, 4, 10);

        assert_eq!(sequential.buckets(), parallel.buckets());
    }

    #[test]
    fn test_members_in_input_order() {
        let signatures = vec![sig(&[7, 7]); 5];
        let index = BandIndex::build_parallel(&signatures, &[1; 5], 1, 0);
        for bucket in index.buckets() {
            assert_eq!(bucket.members, vec![0, 1, 2, 3, 4]);
        }
    }
}
