//! Inbound Ports (Driving Ports)
//!
//! The API callers use regardless of where the bits live.

use async_trait::async_trait;

use crate::error::FilterError;

/// Keyed Bloom filter API (Driving Port)
///
/// `key` names an isolated bit array; elements set under one key are never
/// visible under another.
#[async_trait]
pub trait BloomFilterApi: Send + Sync {
    /// Add `val` to the filter named `key`
    async fn set(&self, key: &str, val: &str) -> Result<(), FilterError>;

    /// Test `val` against the filter named `key`
    ///
    /// `Ok(false)` means definitely absent. `Ok(true)` means possibly present.
    async fn exist(&self, key: &str, val: &str) -> Result<bool, FilterError>;
}
