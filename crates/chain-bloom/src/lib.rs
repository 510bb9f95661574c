//! # chain-bloom
//!
//! Bloom filters whose k bit offsets come from a hash chain, with the bit
//! array held either in process or in Redis.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `Murmur3Encryptor`: 32-bit hash primitive
//!   - `chain_offsets`: k offsets by iterative re-hashing
//!   - `BitIndex`: packed word addressing
//!   - `LocalBloomFilter`: in-process filter
//!   - `BloomConfig`: validated (m, k)
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `BloomFilterApi`: Driving port, keyed set/exist
//!   - `ScriptExecutor`: Driven port, atomic script execution
//!
//! - **Service Layer** (`service/`): Filter engines
//!   - `RemoteBloomFilter`: one atomic script per call
//!   - `LocalFilterRegistry`: keyed local filters behind one lock
//!
//! - **Adapters Layer** (`adapters/`): Store connections
//!   - `RedisScriptClient`: `deadpool-redis` pool running `EVAL`
//!   - `InMemoryScriptStore`: in-process store for tests and development
//!
//! ## Invariants
//!
//! - No false negatives: once `set` returns, `exist` for the same element
//!   under the same key returns true
//! - Bits are never cleared
//! - A remote `set` becomes visible all at once or not at all
//! - Keys are isolated from each other
//!
//! ## Usage Example
//!
//! ```
//! use chain_bloom::LocalBloomFilter;
//!
//! let mut filter = LocalBloomFilter::with_params(64, 3)?;
//! filter.set("alpha");
//! assert!(filter.exist("alpha"));
//! # Ok::<(), chain_bloom::FilterError>(())
//! ```
//!
//! ## Remote Filter
//!
//! ```ignore
//! use chain_bloom::{BloomConfig, RedisConfig, RedisScriptClient, RemoteBloomFilter};
//! use std::sync::Arc;
//!
//! let client = Arc::new(RedisScriptClient::connect(&RedisConfig::from_env())?);
//! let filter = RemoteBloomFilter::new(BloomConfig::new(1 << 20, 3)?, client)?;
//!
//! filter.set("seen-urls", "https://example.com").await?;
//! assert!(filter.exist("seen-urls", "https://example.com").await?);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{InMemoryScriptStore, RedisConfig, RedisScriptClient};
pub use domain::{BloomConfig, BloomConfigBuilder, Encryptor, LocalBloomFilter, Murmur3Encryptor};
pub use error::{FilterError, StoreError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{BloomFilterApi, BloomScript, ScriptExecutor, ScriptReply};
pub use service::{LocalFilterRegistry, RemoteBloomFilter};
