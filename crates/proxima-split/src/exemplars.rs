//! Exemplar selection: one representative instance per class.

use std::collections::BTreeMap;

use rand::Rng;

use crate::dataset::{ClassLabel, Instance};
use crate::draws::{burn_draw, choose};

/// A non-empty ordered group of exemplars anchoring one branch of a split.
///
/// Here each group holds exactly one exemplar (one per class), but routing
/// treats the group as a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ExemplarGroup {
    exemplars: Vec<Instance>,
}

impl ExemplarGroup {
    pub(crate) fn new(exemplars: Vec<Instance>) -> Self {
        debug_assert!(!exemplars.is_empty(), "exemplar group must be non-empty");
        Self { exemplars }
    }

    /// Return the exemplars in this group.
    #[must_use]
    pub fn exemplars(&self) -> &[Instance] {
        &self.exemplars
    }

    /// Return true if any exemplar in the group equals `instance`.
    #[must_use]
    pub fn contains(&self, instance: &Instance) -> bool {
        self.exemplars.iter().any(|exemplar| exemplar == instance)
    }
}

/// Draw one exemplar per class, uniformly at random from that class's
/// instances, producing one singleton group per class in label order.
///
/// Draw parity: [`choose`] consumes no draw for a single-instance class, but
/// the original Proximity Forest always draws once per class, so the missing
/// draw is issued explicitly to keep subsequent draws aligned.
#[must_use]
pub fn pick_exemplars<R: Rng + ?Sized>(
    by_class: &BTreeMap<ClassLabel, Vec<Instance>>,
    rng: &mut R,
) -> Vec<ExemplarGroup> {
    let mut groups = Vec::with_capacity(by_class.len());
    for class_instances in by_class.values() {
        let exemplar = choose(rng, class_instances)
            .expect("classes in the grouping are non-empty")
            .clone();
        if class_instances.len() == 1 {
            burn_draw(rng, 1);
        }
        groups.push(ExemplarGroup::new(vec![exemplar]));
    }
    groups
}
