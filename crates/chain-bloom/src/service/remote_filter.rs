//! Remote Bloom filter
//!
//! Bits live in an external store under caller-chosen keys. Every `set` and
//! `exist` is exactly one atomic script execution carrying all k offsets,
//! so no caller ever observes a partially inserted element.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::domain::{chain_offsets, BloomConfig, ChainMode, Encryptor, Murmur3Encryptor};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{BloomFilterApi, BloomScript, ScriptExecutor, ScriptReply};

/// Bloom filter backed by a script-executing store
///
/// Holds no lock across calls; share it freely behind an `Arc`.
pub struct RemoteBloomFilter<E: ScriptExecutor> {
    config: BloomConfig,
    encryptor: Arc<dyn Encryptor>,
    executor: Arc<E>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<E: ScriptExecutor> RemoteBloomFilter<E> {
    /// Create a remote filter over `executor`, failing fast on invalid parameters
    pub fn new(config: BloomConfig, executor: Arc<E>) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            config,
            encryptor: Arc::new(Murmur3Encryptor::new()),
            executor,
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Replace the hash primitive. Every process sharing a key must use the same one.
    pub fn with_encryptor(mut self, encryptor: Arc<dyn Encryptor>) -> Self {
        self.encryptor = encryptor;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> BloomConfig {
        self.config
    }

    /// `ARGV` for both scripts: `[k, offset_1, ..., offset_k]`
    ///
    /// Offsets are raw chain values; the store addresses bits itself.
    fn script_args(&self, val: &str) -> Vec<u64> {
        let k = self.config.hash_rounds;
        let mut args = Vec::with_capacity(k as usize + 1);
        args.push(u64::from(k));
        args.extend(
            chain_offsets(self.encryptor.as_ref(), val, k, ChainMode::Raw)
                .into_iter()
                .map(u64::from),
        );
        args
    }

    /// Add `val` to the bit array under `key`
    ///
    /// All k bits are set by one atomic script. Store errors are returned
    /// unchanged; any reply other than `1` is an `UnexpectedReply`.
    pub async fn set(&self, key: &str, val: &str) -> Result<(), FilterError> {
        let start = Instant::now();
        let args = self.script_args(val);

        let reply = self
            .executor
            .eval(BloomScript::BatchSetBits, &[key], &args)
            .await
            .map_err(|e| {
                warn!(key = %key, error = %e, "Remote filter set failed");
                self.metrics.record_store_error();
                FilterError::from(e)
            })?;

        match reply {
            ScriptReply::Int(1) => {
                self.metrics.record_insert(start.elapsed());
                debug!(key = %key, rounds = self.config.hash_rounds, "Element set");
                Ok(())
            }
            other => Err(self.unexpected("set", key, other)),
        }
    }

    /// Test `val` against the bit array under `key`
    ///
    /// The script stops at the first unset bit on the store side.
    pub async fn exist(&self, key: &str, val: &str) -> Result<bool, FilterError> {
        let start = Instant::now();
        let args = self.script_args(val);

        let reply = self
            .executor
            .eval(BloomScript::BatchGetBits, &[key], &args)
            .await
            .map_err(|e| {
                warn!(key = %key, error = %e, "Remote filter exist failed");
                self.metrics.record_store_error();
                FilterError::from(e)
            })?;

        let found = match reply {
            ScriptReply::Int(1) => true,
            ScriptReply::Int(0) => false,
            other => return Err(self.unexpected("exist", key, other)),
        };

        self.metrics.record_lookup(start.elapsed(), found);
        debug!(key = %key, found = found, "Element tested");
        Ok(found)
    }

    fn unexpected(&self, operation: &'static str, key: &str, reply: ScriptReply) -> FilterError {
        warn!(key = %key, reply = %reply, operation, "Unexpected script reply");
        self.metrics.record_store_error();
        FilterError::UnexpectedReply {
            operation,
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl<E: ScriptExecutor + 'static> BloomFilterApi for RemoteBloomFilter<E> {
    async fn set(&self, key: &str, val: &str) -> Result<(), FilterError> {
        RemoteBloomFilter::set(self, key, val).await
    }

    async fn exist(&self, key: &str, val: &str) -> Result<bool, FilterError> {
        RemoteBloomFilter::exist(self, key, val).await
    }
}
