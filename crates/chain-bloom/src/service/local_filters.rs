//! Keyed in-process filters
//!
//! `LocalBloomFilter` has no internal locking. This registry gives each key
//! its own filter and serializes access to all of them through one lock, so
//! the local variant can stand in for the remote one behind `BloomFilterApi`.

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{BloomConfig, LocalBloomFilter};
use crate::error::FilterError;
use crate::ports::BloomFilterApi;

/// Local filters by key, created on first `set`
pub struct LocalFilterRegistry {
    config: BloomConfig,
    filters: RwLock<HashMap<String, LocalBloomFilter>>,
}

impl LocalFilterRegistry {
    pub fn new(config: BloomConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            config,
            filters: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> BloomConfig {
        self.config
    }

    /// Number of `set` calls made under `key`, if the key exists
    pub async fn elements_inserted(&self, key: &str) -> Option<u64> {
        self.filters
            .read()
            .await
            .get(key)
            .map(LocalBloomFilter::elements_inserted)
    }

    /// Number of keys holding a filter
    pub async fn len(&self) -> usize {
        self.filters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.filters.read().await.is_empty()
    }

    /// Copy of the filter under `key`, e.g. for snapshotting
    pub async fn snapshot(&self, key: &str) -> Option<LocalBloomFilter> {
        self.filters.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BloomFilterApi for LocalFilterRegistry {
    async fn set(&self, key: &str, val: &str) -> Result<(), FilterError> {
        let mut filters = self.filters.write().await;
        let filter = match filters.entry(key.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(key = %key, "Creating local filter");
                entry.insert(LocalBloomFilter::new(self.config)?)
            }
        };
        filter.set(val);
        Ok(())
    }

    async fn exist(&self, key: &str, val: &str) -> Result<bool, FilterError> {
        let filters = self.filters.read().await;
        Ok(filters.get(key).is_some_and(|filter| filter.exist(val)))
    }
}
