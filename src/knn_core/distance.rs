//! Range-normalized Euclidean distance
//!
//! Each squared feature difference is divided by the squared range observed
//! in the training data, so features measured on different scales contribute
//! comparably:
//!
//! `d(p, q) = sqrt( sum_i (p[i] - q[i])^2 / (upper[i] - lower[i])^2 )`

use crate::knn_core::bounds::{Bound, FeatureBounds};
use crate::utils::{ClassifierError, Result};

/// Contribution of a differing value on a zero-range feature
pub const DEGENERATE_FEATURE_PENALTY: f64 = 1.0;

/// Squared, range-normalized difference of one feature
///
/// # Note
/// A constant training feature (`lower == upper`) has no range to divide by.
/// It contributes 0.0 when both values are equal and
/// [`DEGENERATE_FEATURE_PENALTY`] otherwise, the most any in-range pair can
/// contribute on a non-degenerate feature.
pub fn feature_contribution(a: f64, b: f64, bound: &Bound) -> f64 {
    if bound.is_degenerate() {
        return if a == b { 0.0 } else { DEGENERATE_FEATURE_PENALTY };
    }
    let diff = a - b;
    let range = bound.range();
    (diff * diff) / (range * range)
}

/// Normalized distance between two feature vectors
///
/// # Arguments
/// * `p`, `q` - Feature vectors of equal length
/// * `bounds` - Training bounds with one entry per feature
///
/// # Returns
/// * `Ok(distance)` - Non-negative, symmetric, zero for identical vectors
/// * `Err(ClassifierError::FeatureCountMismatch)` - Lengths disagree
pub fn normalized_distance(p: &[f64], q: &[f64], bounds: &FeatureBounds) -> Result<f64> {
    if p.len() != q.len() || p.len() != bounds.len() {
        return Err(ClassifierError::FeatureCountMismatch {
            context: "distance".to_string(),
            expected: bounds.len(),
            actual: if p.len() != bounds.len() { p.len() } else { q.len() },
        });
    }

    let sum: f64 = p
        .iter()
        .zip(q)
        .zip(bounds.iter())
        .map(|((&a, &b), bound)| feature_contribution(a, b, bound))
        .sum();

    Ok(sum.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(pairs: &[(f64, f64)]) -> FeatureBounds {
        pairs
            .iter()
            .map(|&(lower, upper)| Bound::new(lower, upper))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_distance_normalizes_by_range() {
        // Feature 0 spans 10 units, feature 1 spans 1000
        let b = bounds(&[(0.0, 10.0), (0.0, 1000.0)]);
        let d = normalized_distance(&[0.0, 0.0], &[10.0, 1000.0], &b).unwrap();
        assert!((d - 2.0_f64.sqrt()).abs() < 1e-12);

        let d = normalized_distance(&[0.0, 0.0], &[5.0, 0.0], &b).unwrap();
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_distance_reflexive() {
        let b = bounds(&[(0.0, 1.0), (-5.0, 5.0), (2.0, 3.0)]);
        let p = [0.4, 1.5, 2.2];
        assert_eq!(normalized_distance(&p, &p, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let b = bounds(&[(0.0, 4.0), (1.0, 9.0)]);
        let p = [1.0, 2.0];
        let q = [3.5, 8.0];
        assert_eq!(
            normalized_distance(&p, &q, &b).unwrap(),
            normalized_distance(&q, &p, &b).unwrap()
        );
    }

    #[test]
    fn test_degenerate_feature_equal_values_contribute_zero() {
        let b = bounds(&[(5.0, 5.0), (0.0, 2.0)]);
        let d = normalized_distance(&[5.0, 0.0], &[5.0, 1.0], &b).unwrap();

        assert!(d.is_finite());
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_feature_different_values_penalized() {
        let b = bounds(&[(5.0, 5.0)]);
        let d = normalized_distance(&[5.0], &[7.0], &b).unwrap();
        assert_eq!(d, DEGENERATE_FEATURE_PENALTY.sqrt());

        let bound = Bound::new(5.0, 5.0);
        assert_eq!(feature_contribution(5.0, 5.0, &bound), 0.0);
        assert_eq!(feature_contribution(5.0, 4.0, &bound), 1.0);
    }

    #[test]
    fn test_out_of_range_query_exceeds_one() {
        let b = bounds(&[(0.0, 1.0)]);
        let d = normalized_distance(&[0.0], &[3.0], &b).unwrap();
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_length_mismatch() {
        let b = bounds(&[(0.0, 1.0), (0.0, 1.0)]);
        let err = normalized_distance(&[0.0, 1.0], &[0.0], &b).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::FeatureCountMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }
}
