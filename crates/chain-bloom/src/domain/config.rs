//! Filter configuration and validation
//!
//! # Example
//!
//! ```
//! use chain_bloom::domain::BloomConfigBuilder;
//!
//! let config = BloomConfigBuilder::new()
//!     .size_bits(1 << 16)
//!     .hash_rounds(5)
//!     .build()
//!     .expect("Valid config");
//! assert_eq!(config.size_bits, 65_536);
//! ```

use crate::error::FilterError;
use serde::{Deserialize, Serialize};

use super::parameters::calculate_optimal_parameters;

/// Default bit array size (m)
pub const DEFAULT_SIZE_BITS: u32 = 1 << 20;

/// Default hash rounds (k)
pub const DEFAULT_HASH_ROUNDS: u32 = 3;

/// Largest accepted bit array size; offsets are int32 values
pub const MAX_SIZE_BITS: u32 = i32::MAX as u32;

/// Largest accepted hash round count; k travels to the store as an int32
pub const MAX_HASH_ROUNDS: u32 = i32::MAX as u32;

/// Filter parameters, immutable once a filter is built from them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomConfig {
    /// Number of addressable bits (m)
    pub size_bits: u32,
    /// Number of hash rounds per element (k)
    pub hash_rounds: u32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            size_bits: DEFAULT_SIZE_BITS,
            hash_rounds: DEFAULT_HASH_ROUNDS,
        }
    }
}

impl BloomConfig {
    /// Create a new configuration with validation
    pub fn new(size_bits: u32, hash_rounds: u32) -> Result<Self, FilterError> {
        let config = Self {
            size_bits,
            hash_rounds,
        };
        config.validate()?;
        Ok(config)
    }

    /// Derive (m, k) for an expected element count and false positive rate
    pub fn for_capacity(expected_elements: u64, target_fpr: f64) -> Result<Self, FilterError> {
        if !(target_fpr > 0.0 && target_fpr < 1.0) {
            return Err(FilterError::InvalidParameters(format!(
                "target_fpr must be in (0, 1), got {}",
                target_fpr
            )));
        }
        let params = calculate_optimal_parameters(expected_elements, target_fpr);
        Self::new(params.size_bits, params.hash_rounds)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.size_bits == 0 {
            return Err(FilterError::InvalidParameters(
                "size_bits cannot be 0".to_string(),
            ));
        }

        if self.size_bits > MAX_SIZE_BITS {
            return Err(FilterError::InvalidParameters(format!(
                "size_bits {} exceeds {}",
                self.size_bits, MAX_SIZE_BITS
            )));
        }

        if self.hash_rounds == 0 {
            return Err(FilterError::InvalidParameters(
                "hash_rounds cannot be 0".to_string(),
            ));
        }

        if self.hash_rounds > MAX_HASH_ROUNDS {
            return Err(FilterError::InvalidParameters(format!(
                "hash_rounds {} exceeds {}",
                self.hash_rounds, MAX_HASH_ROUNDS
            )));
        }

        Ok(())
    }
}

/// Builder for BloomConfig with validation
#[derive(Default)]
pub struct BloomConfigBuilder {
    size_bits: Option<u32>,
    hash_rounds: Option<u32>,
}

impl BloomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bit array size (m)
    pub fn size_bits(mut self, bits: u32) -> Self {
        self.size_bits = Some(bits);
        self
    }

    /// Set the number of hash rounds (k)
    pub fn hash_rounds(mut self, rounds: u32) -> Self {
        self.hash_rounds = Some(rounds);
        self
    }

    /// Build the BloomConfig, validating all parameters
    pub fn build(self) -> Result<BloomConfig, FilterError> {
        let defaults = BloomConfig::default();
        BloomConfig::new(
            self.size_bits.unwrap_or(defaults.size_bits),
            self.hash_rounds.unwrap_or(defaults.hash_rounds),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BloomConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_size() {
        let result = BloomConfig::new(0, 3);
        assert!(matches!(result, Err(FilterError::InvalidParameters(_))));
    }

    #[test]
    fn test_rejects_zero_rounds() {
        let result = BloomConfig::new(64, 0);
        assert!(matches!(result, Err(FilterError::InvalidParameters(_))));
    }

    #[test]
    fn test_rejects_size_beyond_i32() {
        let result = BloomConfig::new(MAX_SIZE_BITS + 1, 3);
        assert!(matches!(result, Err(FilterError::InvalidParameters(_))));
        assert!(BloomConfig::new(MAX_SIZE_BITS, 3).is_ok());
    }

    #[test]
    fn test_rejects_rounds_beyond_i32() {
        for k in [MAX_HASH_ROUNDS + 1, u32::MAX] {
            let result = BloomConfig::new(64, k);
            assert!(
                matches!(result, Err(FilterError::InvalidParameters(_))),
                "k = {} should be rejected",
                k
            );
        }
    }

    #[test]
    fn test_builder_rejects_unbounded_rounds() {
        let result = BloomConfigBuilder::new().hash_rounds(u32::MAX).build();
        assert!(matches!(result, Err(FilterError::InvalidParameters(_))));
    }

    #[test]
    fn test_for_capacity() {
        let config = BloomConfig::for_capacity(100, 0.01).unwrap();
        assert!((800..=1200).contains(&config.size_bits));
        assert!((5..=9).contains(&config.hash_rounds));
    }

    #[test]
    fn test_for_capacity_rejects_bad_fpr() {
        for fpr in [0.0, 1.0, -0.5, f64::NAN] {
            let result = BloomConfig::for_capacity(100, fpr);
            assert!(
                matches!(result, Err(FilterError::InvalidParameters(_))),
                "fpr {} should be rejected",
                fpr
            );
        }
    }

    #[test]
    fn test_builder_uses_defaults() {
        let config = BloomConfigBuilder::new().hash_rounds(5).build().unwrap();
        assert_eq!(config.size_bits, DEFAULT_SIZE_BITS);
        assert_eq!(config.hash_rounds, 5);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        let result = BloomConfigBuilder::new().size_bits(0).build();
        assert!(matches!(result, Err(FilterError::InvalidParameters(_))));
    }
}
