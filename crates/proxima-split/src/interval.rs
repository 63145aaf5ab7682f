//! Attribute interval transform: restrict every series to a contiguous
//! sub-range of time steps.

use proxima_dtw::Series;

use crate::dataset::{Dataset, Instance};
use crate::error::SplitError;

/// A contiguous attribute range `[start, start + length)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub struct Interval {
    start: usize,
    length: usize,
}

impl Interval {
    /// Create a new interval.
    #[must_use]
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Return the first attribute covered.
    #[must_use]
    pub fn start(self) -> usize {
        self.start
    }

    /// Return the number of attributes covered.
    #[must_use]
    pub fn length(self) -> usize {
        self.length
    }

    /// Return the first attribute past the interval.
    #[must_use]
    pub fn end(self) -> usize {
        self.start + self.length
    }
}

/// Transform slicing every instance's series to an [`Interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTransform {
    interval: Interval,
}

impl IntervalTransform {
    /// Create a transform over the given interval.
    #[must_use]
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }

    /// Return the interval.
    #[must_use]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Validate the interval against the data it will transform.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::IntervalOutOfBounds`] if the interval is empty
    /// or extends past the data width.
    pub fn fit(&self, data: &Dataset) -> Result<(), SplitError> {
        let n_attributes = data.n_attributes();
        if self.interval.length == 0 || self.interval.end() > n_attributes {
            return Err(SplitError::IntervalOutOfBounds {
                start: self.interval.start,
                length: self.interval.length,
                n_attributes,
            });
        }
        Ok(())
    }

    /// Produce a new dataset with every series sliced to the interval.
    /// Labels and instance order are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::IntervalOutOfBounds`] if the interval does not
    /// fit the data (equivalent to [`IntervalTransform::fit`] failing).
    pub fn transform(&self, data: &Dataset) -> Result<Dataset, SplitError> {
        self.fit(data)?;
        let instances: Vec<Instance> = data
            .instances()
            .iter()
            .map(|instance| {
                let window = &instance.series().as_slice()[self.interval.start..self.interval.end()];
                // a non-empty slice of a validated series is itself valid
                let series =
                    Series::new(window.to_vec()).expect("interval slice of a valid series");
                Instance::new(series, instance.label())
            })
            .collect();
        Dataset::new(instances)
    }
}
