//! Distance measure capability and the concrete measures shipped in-repo.

use std::fmt;

use proxima_dtw::{Dtw, Series, derivative};

/// A distance measure with an early-abandon cutoff.
///
/// `distance(a, b, cutoff)` returns the true distance when it is within
/// `cutoff`. Implementations may abandon once a partial lower bound exceeds
/// `cutoff`; the value returned from an abandoned computation exceeds
/// `cutoff` and is only ordering-correct for comparisons against it — it
/// must not be read as the true distance. A `cutoff` of `f64::INFINITY`
/// disables abandoning.
pub trait DistanceMeasure: fmt::Debug {
    /// Distance between `a` and `b`, abandoned above `cutoff`.
    fn distance(&self, a: &Series, b: &Series, cutoff: f64) -> f64;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Pointwise Euclidean distance with a running-sum early abandon.
///
/// For series of unequal length, the comparison runs over the common prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl DistanceMeasure for Euclidean {
    fn distance(&self, a: &Series, b: &Series, cutoff: f64) -> f64 {
        let cutoff_sq = cutoff * cutoff;
        let mut sum = 0.0;
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            sum += (x - y).powi(2);
            if sum > cutoff_sq {
                // abandoned: the partial root already exceeds the cutoff
                return sum.sqrt();
            }
        }
        sum.sqrt()
    }

    fn name(&self) -> &'static str {
        "euclidean"
    }
}

/// Dynamic time warping distance, optionally banded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtwMeasure {
    dtw: Dtw,
}

impl DtwMeasure {
    /// Unconstrained DTW.
    #[must_use]
    pub fn full() -> Self {
        Self { dtw: Dtw::full() }
    }

    /// DTW with a Sakoe-Chiba band of the given radius.
    #[must_use]
    pub fn banded(radius: usize) -> Self {
        Self {
            dtw: Dtw::banded(radius),
        }
    }
}

impl DistanceMeasure for DtwMeasure {
    fn distance(&self, a: &Series, b: &Series, cutoff: f64) -> f64 {
        if cutoff.is_finite() {
            self.dtw.distance_bounded(a, b, cutoff)
        } else {
            self.dtw.distance(a, b)
        }
    }

    fn name(&self) -> &'static str {
        "dtw"
    }
}

/// Derivative DTW: DTW over the Keogh-Pazzani first derivatives.
///
/// Requires series of length at least 3; the distance space that
/// instantiates this measure validates the data width up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdtwMeasure {
    dtw: Dtw,
}

impl DdtwMeasure {
    /// Unconstrained derivative DTW.
    #[must_use]
    pub fn full() -> Self {
        Self { dtw: Dtw::full() }
    }

    /// Derivative DTW with a Sakoe-Chiba band of the given radius.
    #[must_use]
    pub fn banded(radius: usize) -> Self {
        Self {
            dtw: Dtw::banded(radius),
        }
    }
}

impl DistanceMeasure for DdtwMeasure {
    fn distance(&self, a: &Series, b: &Series, cutoff: f64) -> f64 {
        let da = derivative(a).expect("series validated to length >= 3 when the space was built");
        let db = derivative(b).expect("series validated to length >= 3 when the space was built");
        if cutoff.is_finite() {
            self.dtw.distance_bounded(&da, &db, cutoff)
        } else {
            self.dtw.distance(&da, &db)
        }
    }

    fn name(&self) -> &'static str {
        "ddtw"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>) -> Series {
        Series::new(values).unwrap()
    }

    #[test]
    fn euclidean_known_value() {
        let a = series(vec![0.0, 3.0]);
        let b = series(vec![4.0, 3.0]);
        let d = Euclidean.distance(&a, &b, f64::INFINITY);
        assert!((d - 4.0).abs() < 1e-10);
    }

    #[test]
    fn euclidean_abandoned_value_exceeds_cutoff() {
        let a = series(vec![0.0, 0.0, 0.0]);
        let b = series(vec![5.0, 5.0, 5.0]);
        let cutoff = 1.0;
        let d = Euclidean.distance(&a, &b, cutoff);
        assert!(d > cutoff, "abandoned value {d} must exceed cutoff {cutoff}");
    }

    #[test]
    fn euclidean_exact_within_cutoff() {
        let a = series(vec![1.0, 2.0, 3.0]);
        let b = series(vec![1.5, 2.5, 3.5]);
        let exact = Euclidean.distance(&a, &b, f64::INFINITY);
        let bounded = Euclidean.distance(&a, &b, exact + 0.1);
        assert!((exact - bounded).abs() < 1e-10);
    }

    #[test]
    fn dtw_measure_matches_kernel() {
        let a = series(vec![0.0, 1.0]);
        let b = series(vec![1.0, 0.0]);
        let d = DtwMeasure::full().distance(&a, &b, f64::INFINITY);
        assert!((d - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn dtw_measure_abandons() {
        let a = series(vec![0.0, 0.0, 0.0]);
        let b = series(vec![10.0, 10.0, 10.0]);
        let d = DtwMeasure::full().distance(&a, &b, 1.0);
        assert_eq!(d, f64::INFINITY);
    }

    #[test]
    fn ddtw_ignores_constant_offset() {
        let a = series(vec![0.0, 1.0, 2.0, 3.0]);
        let b = series(vec![5.0, 6.0, 7.0, 8.0]);
        let d = DdtwMeasure::full().distance(&a, &b, f64::INFINITY);
        assert!(d < 1e-10, "derivative distance should be ~0, got {d}");
    }
}
