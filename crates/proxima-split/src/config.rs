//! Configuration builder for proximity split construction.

use rand::Rng;

use crate::dataset::Dataset;
use crate::error::SplitError;
use crate::interval::Interval;
use crate::router::ExemplarCheck;
use crate::scorer::{GiniGain, PartitionScorer};
use crate::space::{DdtwSpace, DistanceSpaceBuilder, DtwSpace, EuclideanSpace};
use crate::split::ProximitySplit;

/// Configuration for building one proximity split.
///
/// Construct via [`SplitConfig::new`] or a preset, then chain `with_*`
/// methods. Building consumes the configuration together with the random
/// source, so a finished split can never be rebuilt.
///
/// # Defaults (the `r5` preset)
///
/// | Parameter                     | Default      |
/// |-------------------------------|--------------|
/// | `r`                           | 5            |
/// | `random_r`                    | `false`      |
/// | `random_tie_break_distances`  | `true`       |
/// | `random_tie_break_candidates` | `false`      |
/// | `early_abandon_distances`     | `false`      |
/// | `exemplar_check`              | `InsideLoop` |
/// | `legacy_random_draws`         | `false`      |
/// | `random_intervals`            | `false`      |
/// | `min_interval_size`           | 3            |
/// | `fixed_interval`              | `None`       |
/// | `space_builders`              | ED, DTW, DDTW|
/// | `scorer`                      | `GiniGain`   |
#[derive(Debug)]
pub struct SplitConfig {
    pub(crate) r: usize,
    pub(crate) random_r: bool,
    pub(crate) random_tie_break_distances: bool,
    pub(crate) random_tie_break_candidates: bool,
    pub(crate) early_abandon_distances: bool,
    pub(crate) exemplar_check: ExemplarCheck,
    pub(crate) legacy_random_draws: bool,
    pub(crate) random_intervals: bool,
    pub(crate) min_interval_size: usize,
    pub(crate) fixed_interval: Option<Interval>,
    pub(crate) space_builders: Vec<Box<dyn DistanceSpaceBuilder>>,
    pub(crate) scorer: Box<dyn PartitionScorer>,
}

impl SplitConfig {
    fn preset(r: usize) -> Self {
        Self {
            r,
            random_r: false,
            random_tie_break_distances: true,
            random_tie_break_candidates: false,
            early_abandon_distances: false,
            exemplar_check: ExemplarCheck::InsideLoop,
            legacy_random_draws: false,
            random_intervals: false,
            min_interval_size: 3,
            fixed_interval: None,
            space_builders: vec![
                Box::new(EuclideanSpace),
                Box::new(DtwSpace),
                Box::new(DdtwSpace),
            ],
            scorer: Box::new(GiniGain),
        }
    }

    /// Create a config considering `r` candidate splits.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidCandidateCount`] if `r` is zero.
    pub fn new(r: usize) -> Result<Self, SplitError> {
        if r == 0 {
            return Err(SplitError::InvalidCandidateCount { r });
        }
        Ok(Self::preset(r))
    }

    /// Single-candidate preset.
    #[must_use]
    pub fn r1() -> Self {
        Self::preset(1)
    }

    /// Five-candidate preset (the default configuration).
    #[must_use]
    pub fn r5() -> Self {
        Self::preset(5)
    }

    /// Ten-candidate preset.
    #[must_use]
    pub fn r10() -> Self {
        Self::preset(10)
    }

    /// Five candidates with the realized count drawn from `[1, 5]`.
    #[must_use]
    pub fn rr5() -> Self {
        Self::preset(5).with_random_r(true)
    }

    /// Ten candidates with the realized count drawn from `[1, 10]`.
    #[must_use]
    pub fn rr10() -> Self {
        Self::preset(10).with_random_r(true)
    }

    /// Five candidates with per-candidate random attribute intervals.
    #[must_use]
    pub fn r5_intervals() -> Self {
        Self::preset(5).with_random_intervals(true)
    }

    // --- Setters ---

    /// Set whether the realized candidate count is drawn uniformly from
    /// `[1, r]`, with the configured `r` becoming the bound.
    #[must_use]
    pub fn with_random_r(mut self, random_r: bool) -> Self {
        self.random_r = random_r;
        self
    }

    /// Set whether equally-near exemplar groups are resolved randomly.
    #[must_use]
    pub fn with_random_tie_break_distances(mut self, enabled: bool) -> Self {
        self.random_tie_break_distances = enabled;
        self
    }

    /// Set whether equally-scored candidates are resolved randomly.
    #[must_use]
    pub fn with_random_tie_break_candidates(mut self, enabled: bool) -> Self {
        self.random_tie_break_candidates = enabled;
        self
    }

    /// Set whether routing early-abandons distance computations.
    #[must_use]
    pub fn with_early_abandon_distances(mut self, enabled: bool) -> Self {
        self.early_abandon_distances = enabled;
        self
    }

    /// Set the exemplar short-circuit mode.
    #[must_use]
    pub fn with_exemplar_check(mut self, exemplar_check: ExemplarCheck) -> Self {
        self.exemplar_check = exemplar_check;
        self
    }

    /// Set whether routing consumes the original Proximity Forest extra
    /// no-op draw on singleton tie-sets.
    #[must_use]
    pub fn with_legacy_random_draws(mut self, enabled: bool) -> Self {
        self.legacy_random_draws = enabled;
        self
    }

    /// Set whether each candidate draws a random attribute interval.
    #[must_use]
    pub fn with_random_intervals(mut self, enabled: bool) -> Self {
        self.random_intervals = enabled;
        self
    }

    /// Set the minimum random interval length.
    #[must_use]
    pub fn with_min_interval_size(mut self, min_interval_size: usize) -> Self {
        self.min_interval_size = min_interval_size;
        self
    }

    /// Set a fixed interval applied to every candidate when random intervals
    /// are disabled. `None` leaves the data untouched.
    #[must_use]
    pub fn with_fixed_interval(mut self, fixed_interval: Option<Interval>) -> Self {
        self.fixed_interval = fixed_interval;
        self
    }

    /// Replace the pool of distance space builders sampled per candidate.
    #[must_use]
    pub fn with_space_builders(
        mut self,
        space_builders: Vec<Box<dyn DistanceSpaceBuilder>>,
    ) -> Self {
        self.space_builders = space_builders;
        self
    }

    /// Replace the partition scorer.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn PartitionScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    // --- Getters ---

    /// Return the configured candidate count.
    #[must_use]
    pub fn r(&self) -> usize {
        self.r
    }

    /// Return whether the realized candidate count is randomized.
    #[must_use]
    pub fn random_r(&self) -> bool {
        self.random_r
    }

    /// Return whether distance ties are broken randomly.
    #[must_use]
    pub fn random_tie_break_distances(&self) -> bool {
        self.random_tie_break_distances
    }

    /// Return whether candidate-score ties are broken randomly.
    #[must_use]
    pub fn random_tie_break_candidates(&self) -> bool {
        self.random_tie_break_candidates
    }

    /// Return whether routing early-abandons distances.
    #[must_use]
    pub fn early_abandon_distances(&self) -> bool {
        self.early_abandon_distances
    }

    /// Return the exemplar short-circuit mode.
    #[must_use]
    pub fn exemplar_check(&self) -> ExemplarCheck {
        self.exemplar_check
    }

    /// Return whether the legacy no-op draw is enabled.
    #[must_use]
    pub fn legacy_random_draws(&self) -> bool {
        self.legacy_random_draws
    }

    /// Return whether random intervals are enabled.
    #[must_use]
    pub fn random_intervals(&self) -> bool {
        self.random_intervals
    }

    /// Return the minimum random interval length.
    #[must_use]
    pub fn min_interval_size(&self) -> usize {
        self.min_interval_size
    }

    /// Return the fixed interval, if any.
    #[must_use]
    pub fn fixed_interval(&self) -> Option<Interval> {
        self.fixed_interval
    }

    /// Return the configured distance space builders.
    #[must_use]
    pub fn space_builders(&self) -> &[Box<dyn DistanceSpaceBuilder>] {
        &self.space_builders
    }

    /// Return the configured scorer.
    #[must_use]
    pub fn scorer(&self) -> &dyn PartitionScorer {
        self.scorer.as_ref()
    }

    /// Build the split on `train_data`, consuming this configuration and
    /// taking ownership of the random source for the life of the split.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`SplitError::EmptySpacePool`] | No distance space builders configured |
    /// | [`SplitError::EmptyDataset`] | `train_data` has zero instances |
    /// | [`SplitError::InvalidMinIntervalSize`] | Random intervals enabled with an unusable minimum size |
    /// | [`SplitError::IntervalOutOfBounds`] | A fixed interval does not fit the data |
    /// | [`SplitError::Series`] | A distance space rejects the data (e.g. too short for DDTW) |
    /// | [`SplitError::RoutingInconsistency`] | A distance tie with random tie break disabled |
    pub fn build<R: Rng>(
        self,
        train_data: Dataset,
        rng: R,
    ) -> Result<ProximitySplit<R>, SplitError> {
        crate::split::build(self, train_data, rng)
    }
}
