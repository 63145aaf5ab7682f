//! Error types for series validation and transforms.

/// Errors from series construction and preprocessing.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Returned when an empty slice is provided as a series.
    #[error("series must be non-empty")]
    Empty,

    /// Returned when a series contains NaN, infinity, or negative infinity.
    #[error("series contains non-finite value at index {index}")]
    NonFinite {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when a series is too short for the derivative transform.
    #[error("series of length {len} is too short for a derivative (need at least 3)")]
    TooShort {
        /// The offending series length.
        len: usize,
    },
}
