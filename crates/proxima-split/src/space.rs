//! Distance spaces: data-dependent pools of measure configurations.
//!
//! A space builder derives the set of plausible measure parameterizations
//! from the training data (e.g. warping window radii scale with the series
//! length); the split builder then draws one configuration per candidate.

use std::fmt;

use proxima_dtw::SeriesError;
use rand::Rng;

use crate::dataset::Dataset;
use crate::draws::uniform_index;
use crate::error::SplitError;
use crate::measure::{DdtwMeasure, DistanceMeasure, DtwMeasure, Euclidean};

/// Factory producing one configured distance measure.
pub type MeasureFactory = Box<dyn Fn() -> Box<dyn DistanceMeasure> + Send + Sync>;

/// A searchable space of distance measure configurations.
pub struct DistanceSpace {
    factories: Vec<MeasureFactory>,
}

impl DistanceSpace {
    /// Create a space from measure factories.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::EmptyDistanceSpace`] if `factories` is empty.
    pub fn new(factories: Vec<MeasureFactory>) -> Result<Self, SplitError> {
        if factories.is_empty() {
            return Err(SplitError::EmptyDistanceSpace);
        }
        Ok(Self { factories })
    }

    /// Return the number of configurations in the space.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Return true if the space has no configurations. Always `false` for a
    /// space constructed via [`DistanceSpace::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Draw one configuration uniformly at random.
    ///
    /// Always consumes exactly one draw, including for singleton spaces —
    /// random search over a space samples unconditionally, even when only
    /// one configuration exists.
    #[must_use]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Box<dyn DistanceMeasure> {
        let index = uniform_index(rng, self.factories.len());
        (self.factories[index])()
    }
}

impl fmt::Debug for DistanceSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceSpace")
            .field("len", &self.factories.len())
            .finish()
    }
}

/// Builds a [`DistanceSpace`] from training data.
pub trait DistanceSpaceBuilder: fmt::Debug {
    /// Derive the space of configurations from `data`.
    ///
    /// # Errors
    ///
    /// Returns an error when the data cannot support this measure family
    /// (e.g. empty data, or series too short for a derivative).
    fn build(&self, data: &Dataset) -> Result<DistanceSpace, SplitError>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Maximum Sakoe-Chiba radius for a given series width: a quarter of the
/// width, the pool Proximity Forest derives its warping windows from.
fn max_radius(n_attributes: usize) -> usize {
    n_attributes / 4
}

/// Space containing the single pointwise Euclidean configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EuclideanSpace;

impl DistanceSpaceBuilder for EuclideanSpace {
    fn build(&self, data: &Dataset) -> Result<DistanceSpace, SplitError> {
        if data.is_empty() {
            return Err(SplitError::EmptyDataset);
        }
        DistanceSpace::new(vec![Box::new(|| Box::new(Euclidean))])
    }

    fn name(&self) -> &'static str {
        "euclidean-space"
    }
}

/// Space of DTW configurations with band radii `0..=n_attributes / 4`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DtwSpace;

impl DistanceSpaceBuilder for DtwSpace {
    fn build(&self, data: &Dataset) -> Result<DistanceSpace, SplitError> {
        if data.is_empty() {
            return Err(SplitError::EmptyDataset);
        }
        let factories: Vec<MeasureFactory> = (0..=max_radius(data.n_attributes()))
            .map(|radius| {
                Box::new(move || Box::new(DtwMeasure::banded(radius)) as Box<dyn DistanceMeasure>)
                    as MeasureFactory
            })
            .collect();
        DistanceSpace::new(factories)
    }

    fn name(&self) -> &'static str {
        "dtw-space"
    }
}

/// Space of derivative-DTW configurations with band radii derived from the
/// derivative length (`n_attributes - 2`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DdtwSpace;

impl DistanceSpaceBuilder for DdtwSpace {
    fn build(&self, data: &Dataset) -> Result<DistanceSpace, SplitError> {
        if data.is_empty() {
            return Err(SplitError::EmptyDataset);
        }
        let n = data.n_attributes();
        if n < 3 {
            return Err(SeriesError::TooShort { len: n }.into());
        }
        let factories: Vec<MeasureFactory> = (0..=max_radius(n - 2))
            .map(|radius| {
                Box::new(move || Box::new(DdtwMeasure::banded(radius)) as Box<dyn DistanceMeasure>)
                    as MeasureFactory
            })
            .collect();
        DistanceSpace::new(factories)
    }

    fn name(&self) -> &'static str {
        "ddtw-space"
    }
}

#[cfg(test)]
mod tests {
    use proxima_dtw::Series;
    use rand::RngCore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::dataset::{ClassLabel, Instance};

    use super::*;

    fn dataset(width: usize) -> Dataset {
        let instances = vec![
            Instance::new(
                Series::new(vec![0.5; width]).unwrap(),
                ClassLabel::new(0),
            ),
            Instance::new(
                Series::new(vec![1.5; width]).unwrap(),
                ClassLabel::new(1),
            ),
        ];
        Dataset::new(instances).unwrap()
    }

    #[test]
    fn empty_space_rejected() {
        assert!(matches!(
            DistanceSpace::new(vec![]),
            Err(SplitError::EmptyDistanceSpace)
        ));
    }

    #[test]
    fn euclidean_space_is_singleton() {
        let space = EuclideanSpace.build(&dataset(8)).unwrap();
        assert_eq!(space.len(), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(space.sample(&mut rng).name(), "euclidean");
    }

    #[test]
    fn sample_always_consumes_one_draw() {
        let space = EuclideanSpace.build(&dataset(8)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut scripted = rng.clone();
        let _ = space.sample(&mut rng);
        let _ = uniform_index(&mut scripted, 1);
        assert_eq!(rng.next_u64(), scripted.next_u64());
    }

    #[test]
    fn dtw_space_scales_with_width() {
        let space = DtwSpace.build(&dataset(40)).unwrap();
        // radii 0..=10
        assert_eq!(space.len(), 11);
    }

    #[test]
    fn ddtw_space_rejects_short_series() {
        let result = DdtwSpace.build(&dataset(2));
        assert!(matches!(
            result,
            Err(SplitError::Series(SeriesError::TooShort { len: 2 }))
        ));
    }

    #[test]
    fn ddtw_space_uses_derivative_width() {
        let space = DdtwSpace.build(&dataset(42)).unwrap();
        // derivative length 40 → radii 0..=10
        assert_eq!(space.len(), 11);
    }

    #[test]
    fn builders_reject_empty_data() {
        let empty = Dataset::new(vec![]).unwrap();
        assert!(matches!(
            DtwSpace.build(&empty),
            Err(SplitError::EmptyDataset)
        ));
    }
}
