//! In-process Bloom filter
//!
//! INVARIANTS:
//! - No false negatives: after `set(v)`, `exist(v)` returns true
//! - Bits only ever go from 0 to 1
//!
//! The filter has no internal locking. `set` takes `&mut self`; callers that
//! share a filter across tasks wrap it (see `service::LocalFilterRegistry`).

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::bit_index::{words_for, BitIndex};
use super::config::BloomConfig;
use super::encryptor::{Encryptor, Murmur3Encryptor};
use super::hash_chain::{chain_offsets, ChainMode};
use super::parameters::calculate_fpr;
use crate::error::FilterError;

/// Bloom filter over a packed `u32` word array
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "FilterSnapshot")]
pub struct LocalBloomFilter {
    config: BloomConfig,
    /// `ceil(m / 32) + 1` words
    words: Vec<u32>,
    /// Number of `set` calls (not distinct elements)
    n: u64,
    #[serde(skip)]
    encryptor: Murmur3Encryptor,
}

impl LocalBloomFilter {
    /// Create an empty filter, failing fast on invalid parameters
    pub fn new(config: BloomConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            words: vec![0; words_for(config.size_bits)],
            config,
            n: 0,
            encryptor: Murmur3Encryptor::new(),
        })
    }

    /// Shorthand for `new(BloomConfig::new(m, k)?)`
    pub fn with_params(m: u32, k: u32) -> Result<Self, FilterError> {
        Self::new(BloomConfig::new(m, k)?)
    }

    /// Add an element
    ///
    /// Setting the same element twice leaves the bits unchanged but still
    /// increments the element count.
    pub fn set(&mut self, val: &str) {
        self.n += 1;
        for offset in self.offsets(val) {
            BitIndex::of(offset).set(&mut self.words);
        }
    }

    /// Test an element
    ///
    /// Returns `false` if the element is definitely absent, `true` if it may
    /// be present. Stops at the first unset bit.
    pub fn exist(&self, val: &str) -> bool {
        self.offsets(val)
            .into_iter()
            .all(|offset| BitIndex::of(offset).test(&self.words))
    }

    fn offsets(&self, val: &str) -> Vec<u32> {
        chain_offsets(
            &self.encryptor,
            val,
            self.config.hash_rounds,
            ChainMode::Reduced {
                modulus: self.config.size_bits,
            },
        )
    }

    pub fn config(&self) -> BloomConfig {
        self.config
    }

    /// Bit array size (m)
    pub fn size_bits(&self) -> u32 {
        self.config.size_bits
    }

    /// Hash rounds (k)
    pub fn hash_rounds(&self) -> u32 {
        self.config.hash_rounds
    }

    /// Number of `set` calls so far (n)
    pub fn elements_inserted(&self) -> u64 {
        self.n
    }

    pub fn bits_set(&self) -> usize {
        self.words.view_bits::<Lsb0>().count_ones()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Raw words, least significant bit first
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Theoretical false positive rate for the current element count
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k
    pub fn false_positive_rate(&self) -> f64 {
        calculate_fpr(self.config.size_bits, self.n, self.config.hash_rounds)
    }

    /// Serialize the filter to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, FilterError> {
        bincode::serialize(self).map_err(|e| FilterError::Snapshot(e.to_string()))
    }

    /// Deserialize a filter from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        bincode::deserialize(bytes).map_err(|e| FilterError::Snapshot(e.to_string()))
    }
}

/// Serialized shape of a filter. Every decode goes through `TryFrom`, so a
/// deserialized filter holds the same invariants as one built by `new`.
#[derive(Deserialize)]
struct FilterSnapshot {
    config: BloomConfig,
    words: Vec<u32>,
    n: u64,
}

impl TryFrom<FilterSnapshot> for LocalBloomFilter {
    type Error = FilterError;

    fn try_from(snapshot: FilterSnapshot) -> Result<Self, Self::Error> {
        snapshot.config.validate()?;
        let expected = words_for(snapshot.config.size_bits);
        if snapshot.words.len() != expected {
            return Err(FilterError::Snapshot(format!(
                "expected {} words for m={}, found {}",
                expected,
                snapshot.config.size_bits,
                snapshot.words.len()
            )));
        }

        Ok(Self {
            config: snapshot.config,
            words: snapshot.words,
            n: snapshot.n,
            encryptor: Murmur3Encryptor::new(),
        })
    }
}
