//! Keogh-Pazzani first-derivative transform, the preprocessing step behind
//! derivative DTW.

use crate::error::SeriesError;
use crate::series::Series;

/// Compute the Keogh-Pazzani first derivative of a series.
///
/// For interior points (1..n-1): `d[i] = ((x[i] - x[i-1]) + (x[i+1] - x[i-1]) / 2) / 2`.
/// Output length is `n - 2` (the first and last points are dropped).
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::TooShort`] | Series has fewer than 3 elements |
#[must_use = "returns a new derivative series; the original is unchanged"]
pub fn derivative(series: &Series) -> Result<Series, SeriesError> {
    let data = series.as_slice();
    let n = data.len();

    if n < 3 {
        return Err(SeriesError::TooShort { len: n });
    }

    let deriv: Vec<f64> = (1..n - 1)
        .map(|i| ((data[i] - data[i - 1]) + (data[i + 1] - data[i - 1]) / 2.0) / 2.0)
        .collect();

    // Derivative of finite values is always finite.
    Ok(Series::new(deriv).expect("derivative values should be finite"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>) -> Series {
        Series::new(values).unwrap()
    }

    #[test]
    fn derivative_length() {
        let s = series(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let d = derivative(&s).unwrap();
        assert_eq!(d.len(), 3, "expected length 3 for input of length 5");
    }

    #[test]
    fn derivative_too_short() {
        let s = series(vec![1.0, 2.0]);
        let result = derivative(&s);
        assert!(
            matches!(result, Err(SeriesError::TooShort { len: 2 })),
            "expected TooShort error, got {result:?}"
        );
    }

    #[test]
    fn derivative_linear_series() {
        let s = series(vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        let d = derivative(&s).unwrap();
        for &v in d.as_slice() {
            assert!((v - 1.0).abs() < 1e-10, "expected ~1.0, got {v}");
        }
    }

    #[test]
    fn derivative_constant_series_is_zero() {
        let s = series(vec![7.0, 7.0, 7.0, 7.0]);
        let d = derivative(&s).unwrap();
        for &v in d.as_slice() {
            assert!(v.abs() < 1e-10, "expected ~0.0, got {v}");
        }
    }
}
