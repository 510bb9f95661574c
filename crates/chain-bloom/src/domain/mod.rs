//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Hash primitive (encryptor)
//! - Packed bit array addressing
//! - Hash chain offset generation
//! - In-process Bloom filter
//! - Parameter calculations and configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod bit_index;
pub mod config;
pub mod encryptor;
pub mod hash_chain;
pub mod local_filter;
pub mod parameters;

pub use bit_index::{words_for, BitIndex, WORD_BITS};
pub use config::{BloomConfig, BloomConfigBuilder};
pub use encryptor::{Encryptor, Murmur3Encryptor, HASH_MODULUS};
pub use hash_chain::{chain_offsets, ChainMode};
pub use local_filter::LocalBloomFilter;
pub use parameters::{calculate_fpr, calculate_optimal_parameters, FilterParams};
