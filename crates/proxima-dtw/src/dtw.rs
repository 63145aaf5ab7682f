//! DTW distance computation.

use tracing::instrument;

use crate::series::Series;
use crate::window::WarpWindow;

/// Immutable DTW configuration. Thread-safe and copyable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw {
    window: WarpWindow,
}

impl Dtw {
    /// Create an unconstrained DTW calculator.
    #[must_use]
    pub fn full() -> Self {
        Self {
            window: WarpWindow::Full,
        }
    }

    /// Create a DTW calculator with a Sakoe-Chiba band of the given radius.
    #[must_use]
    pub fn banded(radius: usize) -> Self {
        Self {
            window: WarpWindow::Band(radius),
        }
    }

    /// Return the warping window configuration.
    #[must_use]
    pub fn window(&self) -> WarpWindow {
        self.window
    }

    /// Compute the DTW distance between two series.
    ///
    /// Uses a rolling two-row buffer rather than allocating the full cost
    /// matrix: O(n * m) time, O(m) space. Step costs are squared differences;
    /// the result is the square root of the accumulated cost.
    ///
    /// For a banded window narrower than the length difference between the
    /// series, no warping path reaches the final cell and the distance is
    /// `f64::INFINITY`.
    #[must_use]
    #[instrument(skip(a, b))]
    pub fn distance(&self, a: &Series, b: &Series) -> f64 {
        self.rolling(a.as_slice(), b.as_slice(), None)
    }

    /// Compute the DTW distance with early abandoning.
    ///
    /// If the distance would exceed `cutoff`, returns `f64::INFINITY` without
    /// completing the computation. This is exact: a finite result equals
    /// `self.distance(a, b)`. A `cutoff` of `f64::INFINITY` disables
    /// abandoning entirely.
    #[must_use]
    #[instrument(skip(a, b))]
    pub fn distance_bounded(&self, a: &Series, b: &Series, cutoff: f64) -> f64 {
        self.rolling(a.as_slice(), b.as_slice(), Some(cutoff * cutoff))
    }

    /// Rolling two-row DTW kernel with optional squared cutoff.
    ///
    /// Rows span the full width of `b`; cells outside the warping window keep
    /// their INF fill, so out-of-band predecessors are rejected without
    /// explicit bounds arithmetic.
    ///
    /// Every valid path visits exactly one cell per row, so the row minimum
    /// is a lower bound on the final accumulated cost. When `cutoff_sq` is
    /// `Some(c)` and a non-final row minimum exceeds `c`, the distance cannot
    /// be within the cutoff and INFINITY is returned. The last row is
    /// excluded from that check because its minimum may belong to a cell
    /// other than (n-1, m-1); the final cell is checked explicitly instead.
    fn rolling(&self, a: &[f64], b: &[f64], cutoff_sq: Option<f64>) -> f64 {
        let n = a.len();
        let m = b.len();

        let mut prev = vec![f64::INFINITY; m];
        let mut curr = vec![f64::INFINITY; m];

        for i in 0..n {
            curr.fill(f64::INFINITY);
            let mut row_min = f64::INFINITY;

            for j in self.window.column_range(i, m) {
                let step = (a[i] - b[j]).powi(2);
                let accumulated = if i == 0 && j == 0 {
                    0.0
                } else {
                    let left = if j > 0 { curr[j - 1] } else { f64::INFINITY };
                    let above = prev[j];
                    let diag = if j > 0 { prev[j - 1] } else { f64::INFINITY };
                    left.min(above).min(diag)
                };
                let val = step + accumulated;
                curr[j] = val;
                row_min = row_min.min(val);
            }

            if let Some(c) = cutoff_sq
                && i < n - 1
                && row_min > c
            {
                return f64::INFINITY;
            }

            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds the last completed row.
        let final_sq = prev[m - 1];

        if let Some(c) = cutoff_sq
            && final_sq > c
        {
            return f64::INFINITY;
        }

        final_sq.sqrt()
    }
}
