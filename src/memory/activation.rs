//! Activation selection: which hard locations respond to an address.
//!
//! A location is activated when the Hamming distance between its address
//! and the query is at most the threshold H (inclusive). Selection is pure,
//! so any number of readers may call it at once.
//!
//! Two scans with identical output:
//! 1. `select_serial`: single-threaded, used for small tables
//! 2. `select_parallel`: rayon over locations, used from
//!    `config::PARALLEL_SCAN_MIN_LOCATIONS` upwards

use rayon::prelude::*;

use crate::config::PARALLEL_SCAN_MIN_LOCATIONS;
use crate::error::{DimensionMismatch, Result, VectorKind};
use crate::memory::binary_vector::BinaryVector;
use crate::memory::hard_location::AddressTable;

/// Borrowed selector over an address table with a fixed threshold.
#[derive(Clone, Copy, Debug)]
pub struct ActivationSelector<'a> {
    table: &'a AddressTable,
    threshold: usize,
}

impl<'a> ActivationSelector<'a> {
    pub fn new(table: &'a AddressTable, threshold: usize) -> Self {
        Self { table, threshold }
    }

    /// Activation threshold H.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Indices (ascending) of all locations within the threshold of `query`.
    ///
    /// May be empty; callers decide what an empty set means.
    pub fn select(&self, query: &BinaryVector) -> Result<Vec<usize>> {
        self.check(query)?;
        if self.table.len() >= PARALLEL_SCAN_MIN_LOCATIONS {
            Ok(self.select_parallel(query))
        } else {
            Ok(self.select_serial(query))
        }
    }

    /// Distance from `query` to every location, in location order.
    pub fn distances(&self, query: &BinaryVector) -> Result<Vec<u32>> {
        self.check(query)?;
        Ok((0..self.table.len())
            .map(|i| self.table.distance(i, query))
            .collect())
    }

    /// Single-threaded scan. Assumes `query` has already been checked.
    pub fn select_serial(&self, query: &BinaryVector) -> Vec<usize> {
        (0..self.table.len())
            .filter(|&i| self.is_active(i, query))
            .collect()
    }

    /// Parallel scan. Assumes `query` has already been checked.
    ///
    /// rayon's indexed collect keeps ascending order, so the result is
    /// identical to `select_serial`.
    pub fn select_parallel(&self, query: &BinaryVector) -> Vec<usize> {
        (0..self.table.len())
            .into_par_iter()
            .filter(|&i| self.is_active(i, query))
            .collect()
    }

    #[inline]
    fn is_active(&self, i: usize, query: &BinaryVector) -> bool {
        self.table.distance(i, query) as usize <= self.threshold
    }

    fn check(&self, query: &BinaryVector) -> Result<()> {
        if query.len() != self.table.dimension() {
            return Err(DimensionMismatch::Length {
                vector: VectorKind::Address,
                expected: self.table.dimension(),
                actual: query.len(),
            }
            .into());
        }
        Ok(())
    }
}

/// Probability that a uniformly random address activates a given location:
/// P(Binomial(N, ½) ≤ H).
///
/// Useful for choosing H so that a target number of locations respond.
/// Summed in log space, so any N gives a finite result.
pub fn activation_probability(address_dimension: usize, threshold: usize) -> f64 {
    let n = address_dimension;
    if threshold >= n {
        return 1.0;
    }

    // ln(C(n, k) / 2^n) for k = 0..=threshold
    let mut log_terms = Vec::with_capacity(threshold + 1);
    let mut log_coeff = 0.0f64;
    for k in 0..=threshold {
        if k > 0 {
            log_coeff += ((n - k + 1) as f64).ln() - (k as f64).ln();
        }
        log_terms.push(log_coeff - n as f64 * std::f64::consts::LN_2);
    }

    let max = log_terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = log_terms.iter().map(|&t| (t - max).exp()).sum();
    (max + sum.ln()).exp().min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdmError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table(rows: usize, dim: usize, seed: u64) -> AddressTable {
        AddressTable::generate(rows, dim, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_exact_match_threshold_zero() {
        let t = table(16, 32, 42);
        let selector = ActivationSelector::new(&t, 0);
        let hits = selector.select(&t.address(5)).unwrap();
        assert!(hits.contains(&5));
        for &i in &hits {
            assert_eq!(t.distance(i, &t.address(5)), 0);
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let t = table(1, 16, 7);
        let mut query = t.address(0);
        for bit in 0..3 {
            query.flip_bit(bit);
        }
        assert_eq!(ActivationSelector::new(&t, 3).select(&query).unwrap(), vec![0]);
        assert!(ActivationSelector::new(&t, 2).select(&query).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_at_dimension_activates_everything() {
        let t = table(20, 8, 3);
        let query = BinaryVector::zeros(8);
        let hits = ActivationSelector::new(&t, 8).select(&query).unwrap();
        assert_eq!(hits, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let t = table(4, 10, 1);
        let err = ActivationSelector::new(&t, 3)
            .select(&BinaryVector::zeros(11))
            .unwrap_err();
        assert!(matches!(
            err,
            SdmError::DimensionMismatch(DimensionMismatch::Length {
                vector: VectorKind::Address,
                expected: 10,
                actual: 11,
            })
        ));
    }

    #[test]
    fn test_serial_matches_parallel() {
        let t = table(5000, 256, 11);
        let selector = ActivationSelector::new(&t, 112);
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..10 {
            let q = BinaryVector::random(256, &mut rng);
            assert_eq!(selector.select_serial(&q), selector.select_parallel(&q));
        }
    }

    #[test]
    fn test_selection_agrees_with_distances() {
        let t = table(300, 100, 5);
        let selector = ActivationSelector::new(&t, 45);
        let q = BinaryVector::random(100, &mut StdRng::seed_from_u64(6));
        let distances = selector.distances(&q).unwrap();
        let expected: Vec<usize> = distances
            .iter()
            .enumerate()
            .filter(|(_, d)| **d <= 45)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(selector.select(&q).unwrap(), expected);
    }

    #[test]
    fn test_activation_probability() {
        assert!((activation_probability(8, 8) - 1.0).abs() < 1e-12);
        assert!((activation_probability(8, 0) - 1.0 / 256.0).abs() < 1e-12);
        // (1 + 8 + 28 + 56) / 256
        assert!((activation_probability(8, 3) - 93.0 / 256.0).abs() < 1e-12);
        let p = activation_probability(100, 37);
        assert!(p > 0.003 && p < 0.01, "p = {}", p);
    }

    #[test]
    fn test_activation_probability_large_dimension() {
        // Median threshold: P(X ≤ n/2) is just over one half.
        let p = activation_probability(4000, 2000);
        assert!(p > 0.5 && p < 0.52, "p = {}", p);

        // Far tail underflows toward zero rather than becoming NaN.
        let tail = activation_probability(10_000, 4000);
        assert!(tail.is_finite() && tail >= 0.0 && tail < 1e-50, "tail = {}", tail);

        let mid = activation_probability(2000, 980);
        assert!(mid > 0.1 && mid < 0.25, "mid = {}", mid);
    }
}
