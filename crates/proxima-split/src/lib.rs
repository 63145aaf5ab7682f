//! Randomized proximity-based data splitting for time-series classification
//! trees.
//!
//! Builds one node of a proximity-tree: among `R` randomly generated
//! candidate splits (distance measure + per-class exemplars + optional
//! attribute interval), keeps the one whose partitioning of the training
//! data scores best, and exposes the winning candidate's routing function
//! for downstream tree construction.
//!
//! All randomness flows through a single caller-supplied [`rand::Rng`], and
//! every draw site is fixed so that seeded runs reproduce the original
//! Proximity Forest draw sequence exactly (including deliberate no-op draws).

mod config;
mod dataset;
mod draws;
mod error;
mod exemplars;
mod interval;
mod measure;
mod ranked;
mod router;
mod scorer;
mod space;
mod split;

pub use config::SplitConfig;
pub use dataset::{ClassLabel, Dataset, Instance};
pub use draws::{burn_draw, choose, uniform_index};
pub use error::SplitError;
pub use exemplars::{ExemplarGroup, pick_exemplars};
pub use interval::{Interval, IntervalTransform};
pub use measure::{DdtwMeasure, DistanceMeasure, DtwMeasure, Euclidean};
pub use ranked::{EmptyMapError, Order, RankedMap, TieRule};
pub use router::{ExemplarCheck, Router};
pub use scorer::{GiniGain, PartitionScorer};
pub use space::{
    DdtwSpace, DistanceSpace, DistanceSpaceBuilder, DtwSpace, EuclideanSpace, MeasureFactory,
};
pub use split::ProximitySplit;
