//! Error types for split construction and routing.

use crate::ranked::EmptyMapError;

/// Errors from proximity split construction and routing.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// Returned when the candidate count is zero.
    #[error("candidate count must be at least 1, got {r}")]
    InvalidCandidateCount {
        /// The invalid candidate count provided.
        r: usize,
    },

    /// Returned when no distance space builders are configured.
    #[error("at least one distance space builder must be configured")]
    EmptySpacePool,

    /// Returned when the training dataset has zero instances.
    #[error("training dataset has zero instances")]
    EmptyDataset,

    /// Returned when an instance has a different number of attributes than expected.
    #[error("instance {instance_index} has {got} attributes, expected {expected}")]
    AttributeCountMismatch {
        /// The expected number of attributes.
        expected: usize,
        /// The actual number of attributes in the instance.
        got: usize,
        /// The zero-based index of the offending instance.
        instance_index: usize,
    },

    /// Returned when the minimum interval size is zero or exceeds the data width.
    #[error("min interval size must be in [1, {n_attributes}], got {min_interval_size}")]
    InvalidMinIntervalSize {
        /// The invalid minimum interval size.
        min_interval_size: usize,
        /// The number of attributes in the working data.
        n_attributes: usize,
    },

    /// Returned when an interval does not fit inside the data it is fitted to.
    #[error(
        "interval [{start}, {start}+{length}) out of bounds for {n_attributes} attributes"
    )]
    IntervalOutOfBounds {
        /// Start attribute of the interval.
        start: usize,
        /// Length of the interval.
        length: usize,
        /// The number of attributes in the data being transformed.
        n_attributes: usize,
    },

    /// Returned when a distance space is constructed with no configurations.
    #[error("distance space contains no configurations")]
    EmptyDistanceSpace,

    /// Returned when more than one exemplar group ties at the minimum
    /// distance while random tie breaking is disabled. Indicates a distance
    /// measure producing a non-strict ordering where one was assumed — a
    /// defect signal, not a recoverable condition.
    #[error("{n_tied} exemplar groups tied at minimum distance with random tie break disabled")]
    RoutingInconsistency {
        /// Number of groups tied at the minimum distance.
        n_tied: usize,
    },

    /// Wraps a ranking map queried while empty (internal invariant violation).
    #[error(transparent)]
    EmptyRankingMap(#[from] EmptyMapError),

    /// Wraps a series validation or transform error.
    #[error(transparent)]
    Series(#[from] proxima_dtw::SeriesError),
}
