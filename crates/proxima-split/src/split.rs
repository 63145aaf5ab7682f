//! Split construction: generate R candidates, rank them, commit the winner.

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::config::SplitConfig;
use crate::dataset::{Dataset, Instance};
use crate::draws::{choose, uniform_index};
use crate::error::SplitError;
use crate::exemplars::{ExemplarGroup, pick_exemplars};
use crate::interval::{Interval, IntervalTransform};
use crate::measure::DistanceMeasure;
use crate::ranked::{RankedMap, TieRule};
use crate::router::{ExemplarCheck, Router};

/// One fully evaluated candidate split. Owned by the ranking map until the
/// winner is drained; the rest are discarded.
struct Candidate {
    groups: Vec<ExemplarGroup>,
    measure: Box<dyn DistanceMeasure>,
    partitions: Vec<Dataset>,
    score: f64,
    interval: Option<IntervalTransform>,
}

/// A committed proximity split: the winning candidate's state, plus the
/// random source it owns for routing tie-breaks.
///
/// Produced only by [`SplitConfig::build`], which consumes the configuration
/// — a built split cannot be rebuilt. Accessors never mutate the committed
/// state; only [`ProximitySplit::route_index`] takes `&mut self`, because
/// tie-breaking consumes draws from the owned random source.
pub struct ProximitySplit<R: Rng> {
    rng: R,
    score: f64,
    measure: Box<dyn DistanceMeasure>,
    exemplar_groups: Vec<ExemplarGroup>,
    partitions: Vec<Dataset>,
    interval_transform: Option<IntervalTransform>,
    train_data: Dataset,
    transformed_train_data: Dataset,
    r_used: usize,
    max_r: Option<usize>,
    early_abandon_distances: bool,
    random_tie_break_distances: bool,
    exemplar_check: ExemplarCheck,
    legacy_random_draws: bool,
}

impl<R: Rng> ProximitySplit<R> {
    /// Return the winning candidate's score.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Return the winning candidate's distance measure.
    #[must_use]
    pub fn distance_measure(&self) -> &dyn DistanceMeasure {
        self.measure.as_ref()
    }

    /// Return the winning candidate's exemplar groups, one per class.
    #[must_use]
    pub fn exemplar_groups(&self) -> &[ExemplarGroup] {
        &self.exemplar_groups
    }

    /// Return the winning candidate's partitions, in exemplar-group order.
    #[must_use]
    pub fn partitions(&self) -> &[Dataset] {
        &self.partitions
    }

    /// Return the winning candidate's interval transform, if any.
    #[must_use]
    pub fn interval_transform(&self) -> Option<IntervalTransform> {
        self.interval_transform
    }

    /// Return the original (untransformed) training data.
    #[must_use]
    pub fn train_data(&self) -> &Dataset {
        &self.train_data
    }

    /// Return the working copy of the training data as it stood after the
    /// candidate loop — transformed, when intervals were in play — for
    /// downstream consumers that need the transformed view.
    #[must_use]
    pub fn transformed_train_data(&self) -> &Dataset {
        &self.transformed_train_data
    }

    /// Return the number of candidate iterations actually run.
    #[must_use]
    pub fn r_used(&self) -> usize {
        self.r_used
    }

    /// Return the random-R bound, when random R was enabled.
    #[must_use]
    pub fn max_r(&self) -> Option<usize> {
        self.max_r
    }

    /// Route `instance` to the index of its nearest exemplar group under the
    /// committed measure — the partition a downstream tree traversal should
    /// descend into.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::RoutingInconsistency`] on a distance tie with
    /// random tie break disabled.
    pub fn route_index(&mut self, instance: &Instance) -> Result<usize, SplitError> {
        let router = Router::new(&self.exemplar_groups, self.measure.as_ref())
            .with_early_abandon(self.early_abandon_distances)
            .with_random_tie_break(self.random_tie_break_distances)
            .with_exemplar_check(self.exemplar_check)
            .with_legacy_random_draws(self.legacy_random_draws);
        router.route(instance, &mut self.rng)
    }
}

/// Draw (or take) the interval for one candidate and apply it to the
/// working data. Random mode draws a length in
/// `[min_interval_size, n_attributes]`, then a start in
/// `[0, n_attributes - length]` — two draws, in that order.
fn pick_interval<R: Rng>(
    config: &SplitConfig,
    working: &mut Dataset,
    rng: &mut R,
) -> Result<Option<IntervalTransform>, SplitError> {
    let transform = if config.random_intervals {
        let n_attributes = working.n_attributes();
        let min = config.min_interval_size;
        if min == 0 || min > n_attributes {
            return Err(SplitError::InvalidMinIntervalSize {
                min_interval_size: min,
                n_attributes,
            });
        }
        let length = uniform_index(rng, n_attributes + 1 - min) + min;
        let start = uniform_index(rng, n_attributes + 1 - length);
        Some(IntervalTransform::new(Interval::new(start, length)))
    } else {
        config.fixed_interval.map(IntervalTransform::new)
    };
    match transform {
        Some(transform) => {
            transform.fit(working)?;
            *working = transform.transform(working)?;
            Ok(Some(transform))
        }
        None => Ok(None),
    }
}

/// Draw one distance measure: pick a space builder from the pool, build its
/// space from the current working data, draw one configuration.
fn pick_measure<R: Rng>(
    config: &SplitConfig,
    working: &Dataset,
    rng: &mut R,
) -> Result<Box<dyn DistanceMeasure>, SplitError> {
    let builder = choose(rng, &config.space_builders)
        .expect("space builder pool validated non-empty before the loop");
    let space = builder.build(working)?;
    Ok(space.sample(rng))
}

#[instrument(skip_all, fields(r = config.r, n_instances = train_data.len()))]
pub(crate) fn build<R: Rng>(
    config: SplitConfig,
    train_data: Dataset,
    mut rng: R,
) -> Result<ProximitySplit<R>, SplitError> {
    // configuration checks precede every random draw
    if config.space_builders.is_empty() {
        return Err(SplitError::EmptySpacePool);
    }
    if train_data.is_empty() {
        return Err(SplitError::EmptyDataset);
    }

    // class view of the original data; exemplars are drawn from this
    // grouping on every iteration, untouched by interval transforms
    let by_class = train_data.by_class();

    let candidate_ties = if config.random_tie_break_candidates {
        TieRule::KeepAll
    } else {
        TieRule::DiscardNewest
    };
    let mut ranking: RankedMap<Candidate> = RankedMap::descending(candidate_ties);

    let (r_used, max_r) = if config.random_r {
        let max_r = config.r;
        (uniform_index(&mut rng, max_r) + 1, Some(max_r))
    } else {
        (config.r, None)
    };

    info!(r_used, n_classes = by_class.len(), "building proximity split");

    // the loop mutates this working copy (interval transforms compound);
    // `train_data` itself is committed untouched
    let mut working = train_data.clone();

    for candidate_index in 0..r_used {
        let interval = pick_interval(&config, &mut working, &mut rng)?;
        let measure = pick_measure(&config, &working, &mut rng)?;
        let groups = pick_exemplars(&by_class, &mut rng);

        let router = Router::new(&groups, measure.as_ref())
            .with_early_abandon(config.early_abandon_distances)
            .with_random_tie_break(config.random_tie_break_distances)
            .with_exemplar_check(config.exemplar_check)
            .with_legacy_random_draws(config.legacy_random_draws);

        let mut partitions: Vec<Dataset> = groups.iter().map(|_| Dataset::default()).collect();
        for instance in working.instances() {
            let index = router.route(instance, &mut rng)?;
            partitions[index].push(instance.clone());
        }

        let score = config.scorer.score(&working, &partitions);
        debug!(
            candidate = candidate_index,
            score,
            measure = measure.name(),
            "scored split candidate"
        );
        ranking.put(
            score,
            Candidate {
                groups,
                measure,
                partitions,
                score,
                interval,
            },
        );
    }

    let best_score = ranking.first_key()?;
    let mut winners = ranking.into_best_values();
    let winner_index = if winners.len() > 1 {
        uniform_index(&mut rng, winners.len())
    } else {
        0
    };
    let chosen = winners.swap_remove(winner_index);

    info!(score = best_score, "proximity split committed");

    Ok(ProximitySplit {
        rng,
        score: chosen.score,
        measure: chosen.measure,
        exemplar_groups: chosen.groups,
        partitions: chosen.partitions,
        interval_transform: chosen.interval,
        train_data,
        transformed_train_data: working,
        r_used,
        max_r,
        early_abandon_distances: config.early_abandon_distances,
        random_tie_break_distances: config.random_tie_break_distances,
        exemplar_check: config.exemplar_check,
        legacy_random_draws: config.legacy_random_draws,
    })
}
