//! Elastic distance kernel for univariate time series.
//!
//! Pure math library — zero I/O, zero randomness. Provides a validated
//! series type, Dynamic Time Warping with an optional Sakoe-Chiba warping
//! window and early-abandon cutoff, and the Keogh-Pazzani first derivative
//! used by derivative DTW.

mod derivative;
mod dtw;
mod error;
mod series;
mod window;

pub use derivative::derivative;
pub use dtw::Dtw;
pub use error::SeriesError;
pub use series::Series;
pub use window::WarpWindow;
