//! Bloom filter parameter math
//!
//! Formulas:
//! - FPR = (1 - e^(-kn/m))^k
//! - m = -n*ln(fpr) / (ln(2)^2)  -- optimal bits
//! - k = (m/n) * ln(2)           -- optimal hash rounds

use std::f64::consts::LN_2;

/// Upper bound for derived hash rounds
pub const MAX_DERIVED_ROUNDS: u32 = 32;

/// Derived filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct FilterParams {
    /// Number of addressable bits (m)
    pub size_bits: u32,
    /// Number of hash rounds (k)
    pub hash_rounds: u32,
    /// Expected false positive rate at the requested capacity
    pub expected_fpr: f64,
}

/// Calculate parameters that reach `target_fpr` for `num_elements` inserts
///
/// `size_bits` saturates at `i32::MAX`.
pub fn calculate_optimal_parameters(num_elements: u64, target_fpr: f64) -> FilterParams {
    if num_elements == 0 {
        return FilterParams {
            size_bits: 1,
            hash_rounds: 1,
            expected_fpr: 1.0,
        };
    }

    let n = num_elements as f64;
    let ln2_squared = LN_2 * LN_2;

    let m = (-n * target_fpr.ln() / ln2_squared).ceil();
    let m = m.clamp(1.0, i32::MAX as f64) as u32;

    let k = ((m as f64 / n) * LN_2).round() as u32;
    let k = k.clamp(1, MAX_DERIVED_ROUNDS);

    FilterParams {
        size_bits: m,
        hash_rounds: k,
        expected_fpr: calculate_fpr(m, num_elements, k),
    }
}

/// Theoretical false positive rate after `n` inserts
pub fn calculate_fpr(m: u32, n: u64, k: u32) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_parameters_n100_fpr001() {
        // For n=100, FPR=0.01 → expect k≈7, m≈959
        let params = calculate_optimal_parameters(100, 0.01);

        assert!(
            (5..=9).contains(&params.hash_rounds),
            "Expected k≈7, got k={}",
            params.hash_rounds
        );
        assert!(
            (800..=1200).contains(&params.size_bits),
            "Expected m≈959, got m={}",
            params.size_bits
        );
    }

    #[test]
    fn test_fpr_calculation() {
        // With m=1000, n=100, k=7, FPR should be around 0.008
        let fpr = calculate_fpr(1000, 100, 7);
        assert!(fpr > 0.005 && fpr < 0.02, "Expected FPR≈0.008, got {}", fpr);
    }

    #[test]
    fn test_empty_filter_has_zero_fpr() {
        assert_eq!(calculate_fpr(64, 0, 3), 0.0);
    }

    #[test]
    fn test_expected_fpr_meets_target() {
        let target_fpr = 0.01;
        let params = calculate_optimal_parameters(100, target_fpr);

        assert!(
            params.expected_fpr <= target_fpr * 1.1,
            "Expected FPR {} should be <= target {}",
            params.expected_fpr,
            target_fpr
        );
    }

    #[test]
    fn test_zero_elements() {
        let params = calculate_optimal_parameters(0, 0.01);
        assert_eq!(params.size_bits, 1);
        assert_eq!(params.hash_rounds, 1);
    }

    #[test]
    fn test_rounds_clamped() {
        let params = calculate_optimal_parameters(10, 0.000_000_1);
        assert!(params.hash_rounds <= MAX_DERIVED_ROUNDS);
        assert!(params.hash_rounds >= 1);
    }

    #[test]
    fn test_size_saturates_at_i32_max() {
        let params = calculate_optimal_parameters(u64::MAX / 2, 0.0001);
        assert_eq!(params.size_bits, i32::MAX as u32);
    }

    #[test]
    fn test_larger_n_needs_more_bits() {
        let small = calculate_optimal_parameters(100, 0.01);
        let large = calculate_optimal_parameters(1000, 0.01);
        assert!(large.size_bits > small.size_bits);
    }
}
