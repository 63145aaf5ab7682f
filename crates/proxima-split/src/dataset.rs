//! Labeled instances and datasets.

use std::collections::BTreeMap;
use std::fmt;

use proxima_dtw::Series;

use crate::error::SplitError;

/// Zero-based class label.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct ClassLabel(usize);

impl ClassLabel {
    /// Create a new class label from a zero-based index.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based class index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labeled training instance: one series plus its class label.
///
/// Equality is by value over both the series and the label; the router's
/// exact-match short-circuit relies on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    series: Series,
    label: ClassLabel,
}

impl Instance {
    /// Create a new labeled instance.
    #[must_use]
    pub fn new(series: Series, label: ClassLabel) -> Self {
        Self { series, label }
    }

    /// Return the series.
    #[must_use]
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Return the class label.
    #[must_use]
    pub fn label(&self) -> ClassLabel {
        self.label
    }

    /// Return the number of attributes (time steps), excluding the label.
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.series.len()
    }
}

/// An ordered collection of instances with a uniform attribute count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    instances: Vec<Instance>,
}

impl Dataset {
    /// Create a new dataset, validating that all instances have the same
    /// number of attributes.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::AttributeCountMismatch`] if instance widths differ.
    pub fn new(instances: Vec<Instance>) -> Result<Self, SplitError> {
        if let Some(first) = instances.first() {
            let expected = first.n_attributes();
            for (instance_index, instance) in instances.iter().enumerate() {
                if instance.n_attributes() != expected {
                    return Err(SplitError::AttributeCountMismatch {
                        expected,
                        got: instance.n_attributes(),
                        instance_index,
                    });
                }
            }
        }
        Ok(Self { instances })
    }

    /// Return the instances in insertion order.
    #[must_use]
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Return the number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Return true if the dataset has no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Return the number of attributes per instance (0 for an empty dataset).
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.instances.first().map_or(0, Instance::n_attributes)
    }

    /// Group instances by class label, preserving instance order within each
    /// class. Labels iterate in ascending order, which keeps downstream
    /// random-draw sequences reproducible.
    #[must_use]
    pub fn by_class(&self) -> BTreeMap<ClassLabel, Vec<Instance>> {
        let mut grouped: BTreeMap<ClassLabel, Vec<Instance>> = BTreeMap::new();
        for instance in &self.instances {
            grouped.entry(instance.label()).or_default().push(instance.clone());
        }
        grouped
    }

    /// Append an instance. Callers are responsible for width consistency;
    /// used internally to accumulate partitions from an already-uniform
    /// working set.
    pub(crate) fn push(&mut self, instance: Instance) {
        self.instances.push(instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(values: Vec<f64>, label: usize) -> Instance {
        Instance::new(Series::new(values).unwrap(), ClassLabel::new(label))
    }

    #[test]
    fn class_label_roundtrip() {
        let label = ClassLabel::new(3);
        assert_eq!(label.index(), 3);
        assert_eq!(format!("{label}"), "3");
    }

    #[test]
    fn rejects_mismatched_widths() {
        let result = Dataset::new(vec![
            instance(vec![1.0, 2.0], 0),
            instance(vec![1.0, 2.0, 3.0], 1),
        ]);
        assert!(matches!(
            result,
            Err(SplitError::AttributeCountMismatch { expected: 2, got: 3, instance_index: 1 })
        ));
    }

    #[test]
    fn empty_dataset_is_valid() {
        let data = Dataset::new(vec![]).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.n_attributes(), 0);
    }

    #[test]
    fn by_class_groups_in_label_order() {
        let data = Dataset::new(vec![
            instance(vec![1.0], 2),
            instance(vec![2.0], 0),
            instance(vec![3.0], 2),
            instance(vec![4.0], 1),
        ])
        .unwrap();
        let grouped = data.by_class();
        let labels: Vec<usize> = grouped.keys().map(|l| l.index()).collect();
        assert_eq!(labels, vec![0, 1, 2]);
        assert_eq!(grouped[&ClassLabel::new(2)].len(), 2);
        // order within a class follows dataset order
        assert_eq!(grouped[&ClassLabel::new(2)][0].series().as_slice(), &[1.0]);
        assert_eq!(grouped[&ClassLabel::new(2)][1].series().as_slice(), &[3.0]);
    }

    #[test]
    fn instance_equality_by_value() {
        let a = instance(vec![1.0, 2.0], 0);
        let b = instance(vec![1.0, 2.0], 0);
        let c = instance(vec![1.0, 2.0], 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
