//! Nearest-exemplar-group routing.

use rand::Rng;

use crate::dataset::Instance;
use crate::draws::{burn_draw, uniform_index};
use crate::error::SplitError;
use crate::exemplars::ExemplarGroup;
use crate::measure::DistanceMeasure;
use crate::ranked::{RankedMap, TieRule};

/// When the router checks whether the query instance is itself an exemplar.
///
/// An instance equal to one of its exemplars always belongs to that
/// exemplar's partition, with no distance computation needed for it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub enum ExemplarCheck {
    /// Scan every exemplar for an exact match before computing any distance.
    BeforeLoop,
    /// Check each exemplar as it is visited, interleaved with distance
    /// computation (the original Proximity Forest behavior): exemplars visited earlier have
    /// already had their distances computed when a later match returns.
    #[default]
    InsideLoop,
}

/// Maps an instance to the index of its nearest exemplar group under a
/// distance measure.
#[derive(Debug)]
pub struct Router<'a> {
    groups: &'a [ExemplarGroup],
    measure: &'a dyn DistanceMeasure,
    early_abandon: bool,
    random_tie_break: bool,
    check: ExemplarCheck,
    legacy_random_draws: bool,
}

impl<'a> Router<'a> {
    /// Create a router over the given exemplar groups and measure.
    ///
    /// Defaults: no early abandon, random tie break enabled, in-loop
    /// exemplar check, no legacy draws.
    #[must_use]
    pub fn new(groups: &'a [ExemplarGroup], measure: &'a dyn DistanceMeasure) -> Self {
        Self {
            groups,
            measure,
            early_abandon: false,
            random_tie_break: true,
            check: ExemplarCheck::default(),
            legacy_random_draws: false,
        }
    }

    /// Set whether distance computations are early-abandoned against the
    /// minimum complete distance observed so far.
    #[must_use]
    pub fn with_early_abandon(mut self, early_abandon: bool) -> Self {
        self.early_abandon = early_abandon;
        self
    }

    /// Set whether equally-near groups are resolved by a uniform random
    /// draw. When disabled, a multi-way minimum is a defect and routing
    /// fails with [`SplitError::RoutingInconsistency`].
    #[must_use]
    pub fn with_random_tie_break(mut self, random_tie_break: bool) -> Self {
        self.random_tie_break = random_tie_break;
        self
    }

    /// Set the exemplar short-circuit mode.
    #[must_use]
    pub fn with_exemplar_check(mut self, check: ExemplarCheck) -> Self {
        self.check = check;
        self
    }

    /// Set whether a singleton tie-set still consumes one no-op draw.
    ///
    /// The original Proximity Forest draws unconditionally after ranking;
    /// [`crate::choose`]-style selection only draws for multi-member sets,
    /// so parity requires replicating the draw for singletons.
    #[must_use]
    pub fn with_legacy_random_draws(mut self, legacy_random_draws: bool) -> Self {
        self.legacy_random_draws = legacy_random_draws;
        self
    }

    /// Return the index of the exemplar group nearest to `instance`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SplitError::EmptyRankingMap`] | No exemplar groups to rank |
    /// | [`SplitError::RoutingInconsistency`] | Tie break disabled and more than one group at the minimum |
    pub fn route<R: Rng + ?Sized>(
        &self,
        instance: &Instance,
        rng: &mut R,
    ) -> Result<usize, SplitError> {
        if self.check == ExemplarCheck::BeforeLoop {
            for (index, group) in self.groups.iter().enumerate() {
                if group.contains(instance) {
                    return Ok(index);
                }
            }
        }

        let ties = if self.random_tie_break {
            TieRule::KeepAll
        } else {
            TieRule::DiscardNewest
        };
        let mut nearest: RankedMap<usize> = RankedMap::ascending(ties);
        let mut cutoff = f64::INFINITY;

        for (index, group) in self.groups.iter().enumerate() {
            for exemplar in group.exemplars() {
                if self.check == ExemplarCheck::InsideLoop && exemplar == instance {
                    return Ok(index);
                }
                let distance = self.measure.distance(instance.series(), exemplar.series(), cutoff);
                if self.early_abandon {
                    // abandoned results exceed the cutoff by contract, so
                    // only complete computations can tighten it
                    cutoff = cutoff.min(distance);
                }
                nearest.put(distance, index);
            }
        }

        nearest.first_key()?;
        let tied = nearest.best_values();
        let n_tied = tied.len();
        if !self.random_tie_break && n_tied != 1 {
            return Err(SplitError::RoutingInconsistency { n_tied });
        }
        let winner = if n_tied > 1 {
            tied[uniform_index(rng, n_tied)]
        } else {
            tied[0]
        };
        if self.legacy_random_draws && n_tied == 1 {
            burn_draw(rng, n_tied);
        }
        Ok(winner)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use proxima_dtw::Series;
    use rand::RngCore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::dataset::ClassLabel;
    use crate::measure::Euclidean;

    use super::*;

    fn instance(values: Vec<f64>, label: usize) -> Instance {
        Instance::new(Series::new(values).unwrap(), ClassLabel::new(label))
    }

    fn groups_at(positions: &[f64]) -> Vec<ExemplarGroup> {
        positions
            .iter()
            .enumerate()
            .map(|(label, &p)| ExemplarGroup::new(vec![instance(vec![p, p], label)]))
            .collect()
    }

    /// Measure that counts calls and returns a constant.
    #[derive(Debug)]
    struct ConstMeasure {
        value: f64,
        calls: Cell<usize>,
    }

    impl ConstMeasure {
        fn new(value: f64) -> Self {
            Self {
                value,
                calls: Cell::new(0),
            }
        }
    }

    impl DistanceMeasure for ConstMeasure {
        fn distance(&self, _a: &Series, _b: &Series, _cutoff: f64) -> f64 {
            self.calls.set(self.calls.get() + 1);
            self.value
        }

        fn name(&self) -> &'static str {
            "const"
        }
    }

    /// Measure replaying scripted distances and recording the cutoffs it saw.
    #[derive(Debug)]
    struct ScriptedMeasure {
        distances: Vec<f64>,
        call: Cell<usize>,
        cutoffs: std::cell::RefCell<Vec<f64>>,
    }

    impl ScriptedMeasure {
        fn new(distances: Vec<f64>) -> Self {
            Self {
                distances,
                call: Cell::new(0),
                cutoffs: std::cell::RefCell::new(Vec::new()),
            }
        }
    }

    impl DistanceMeasure for ScriptedMeasure {
        fn distance(&self, _a: &Series, _b: &Series, cutoff: f64) -> f64 {
            let index = self.call.get();
            self.call.set(index + 1);
            self.cutoffs.borrow_mut().push(cutoff);
            self.distances[index]
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[test]
    fn exact_match_before_loop_skips_distances() {
        let groups = groups_at(&[0.0, 5.0, 9.0]);
        let measure = ConstMeasure::new(1.0);
        let router = Router::new(&groups, &measure).with_exemplar_check(ExemplarCheck::BeforeLoop);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let query = instance(vec![5.0, 5.0], 1);
        assert_eq!(router.route(&query, &mut rng).unwrap(), 1);
        assert_eq!(measure.calls.get(), 0);
    }

    #[test]
    fn exact_match_inside_loop_computes_earlier_distances() {
        let groups = groups_at(&[0.0, 5.0, 9.0]);
        let measure = ConstMeasure::new(1.0);
        let router = Router::new(&groups, &measure).with_exemplar_check(ExemplarCheck::InsideLoop);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let query = instance(vec![5.0, 5.0], 1);
        assert_eq!(router.route(&query, &mut rng).unwrap(), 1);
        // group 0's exemplar was visited (and measured) before the match
        assert_eq!(measure.calls.get(), 1);
    }

    #[test]
    fn exact_match_holds_for_both_modes_regardless_of_measure() {
        // even a measure claiming everything is at distance 0 cannot beat
        // the exact-match short circuit
        let groups = groups_at(&[0.0, 5.0]);
        let measure = ConstMeasure::new(0.0);
        for check in [ExemplarCheck::BeforeLoop, ExemplarCheck::InsideLoop] {
            let router = Router::new(&groups, &measure).with_exemplar_check(check);
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let query = instance(vec![0.0, 0.0], 0);
            assert_eq!(router.route(&query, &mut rng).unwrap(), 0);
        }
    }

    #[test]
    fn distinct_distances_route_deterministically_without_draws() {
        let groups = groups_at(&[0.0, 10.0]);
        let measure = Euclidean;
        let router = Router::new(&groups, &measure);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut untouched = rng.clone();

        let query = instance(vec![2.0, 2.0], 0);
        for _ in 0..3 {
            assert_eq!(router.route(&query, &mut rng).unwrap(), 0);
        }
        // singleton tie-set without legacy draws consumes nothing
        assert_eq!(rng.next_u64(), untouched.next_u64());
    }

    #[test]
    fn tie_break_enabled_splits_roughly_evenly() {
        let groups = groups_at(&[0.0, 4.0]);
        let measure = ConstMeasure::new(1.0);
        let router = Router::new(&groups, &measure).with_random_tie_break(true);
        let query = instance(vec![2.0, 2.0], 0);

        let mut picks = [0usize; 2];
        for seed in 0..400 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            picks[router.route(&query, &mut rng).unwrap()] += 1;
        }
        assert!(picks[0] > 120, "group 0 picked {} of 400", picks[0]);
        assert!(picks[1] > 120, "group 1 picked {} of 400", picks[1]);
    }

    #[test]
    fn tie_break_disabled_keeps_first_and_draws_nothing() {
        // discard-newest retains the earliest group recorded at the minimum,
        // so the router is deterministic and consumes no randomness
        let groups = groups_at(&[0.0, 4.0, 8.0]);
        let measure = ConstMeasure::new(1.0);
        let router = Router::new(&groups, &measure).with_random_tie_break(false);
        let query = instance(vec![2.0, 2.0], 0);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut untouched = rng.clone();
        assert_eq!(router.route(&query, &mut rng).unwrap(), 0);
        assert_eq!(rng.next_u64(), untouched.next_u64());
    }

    #[test]
    fn legacy_draws_consume_one_on_singleton_tie_set() {
        let groups = groups_at(&[0.0, 10.0]);
        let measure = Euclidean;
        let router = Router::new(&groups, &measure).with_legacy_random_draws(true);
        let query = instance(vec![2.0, 2.0], 0);

        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut scripted = rng.clone();
        assert_eq!(router.route(&query, &mut rng).unwrap(), 0);
        burn_draw(&mut scripted, 1);
        assert_eq!(rng.next_u64(), scripted.next_u64());
    }

    #[test]
    fn early_abandon_tightens_cutoff_with_complete_distances() {
        let groups = groups_at(&[0.0, 1.0, 2.0]);
        let measure = ScriptedMeasure::new(vec![5.0, 3.0, 7.0]);
        let router = Router::new(&groups, &measure).with_early_abandon(true);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let query = instance(vec![100.0, 100.0], 0);
        assert_eq!(router.route(&query, &mut rng).unwrap(), 1);
        let cutoffs = measure.cutoffs.borrow();
        assert_eq!(cutoffs[0], f64::INFINITY);
        assert_eq!(cutoffs[1], 5.0);
        assert_eq!(cutoffs[2], 3.0);
    }

    #[test]
    fn no_early_abandon_passes_infinite_cutoffs() {
        let groups = groups_at(&[0.0, 1.0, 2.0]);
        let measure = ScriptedMeasure::new(vec![5.0, 3.0, 7.0]);
        let router = Router::new(&groups, &measure).with_early_abandon(false);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let query = instance(vec![100.0, 100.0], 0);
        assert_eq!(router.route(&query, &mut rng).unwrap(), 1);
        for &cutoff in measure.cutoffs.borrow().iter() {
            assert_eq!(cutoff, f64::INFINITY);
        }
    }

    #[test]
    fn no_groups_is_an_internal_error() {
        let groups: Vec<ExemplarGroup> = Vec::new();
        let measure = Euclidean;
        let router = Router::new(&groups, &measure);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let query = instance(vec![0.0, 0.0], 0);
        assert!(matches!(
            router.route(&query, &mut rng),
            Err(SplitError::EmptyRankingMap(_))
        ));
    }
}
