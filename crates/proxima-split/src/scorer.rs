//! Partition quality scoring.

use std::collections::BTreeMap;
use std::fmt;

use crate::dataset::{ClassLabel, Dataset};

/// Scores how well a partitioning separates classes. Higher is better.
pub trait PartitionScorer: fmt::Debug {
    /// Score `partitions` of `data`.
    fn score(&self, data: &Dataset, partitions: &[Dataset]) -> f64;
}

/// Gini impurity gain: parent impurity minus the size-weighted mean impurity
/// of the partitions. Zero for an uninformative split, positive when the
/// partitions are purer than the parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GiniGain;

/// Gini impurity of a class-count distribution: `1 - Σ(p_i²)`.
fn gini(counts: &BTreeMap<ClassLabel, usize>, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let total = n as f64;
    let sum_sq: f64 = counts
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

fn class_counts(data: &Dataset) -> BTreeMap<ClassLabel, usize> {
    let mut counts = BTreeMap::new();
    for instance in data.instances() {
        *counts.entry(instance.label()).or_insert(0) += 1;
    }
    counts
}

impl PartitionScorer for GiniGain {
    fn score(&self, data: &Dataset, partitions: &[Dataset]) -> f64 {
        let n = data.len();
        if n == 0 {
            return 0.0;
        }
        let parent = gini(&class_counts(data), n);
        let weighted_children: f64 = partitions
            .iter()
            .map(|partition| {
                let weight = partition.len() as f64 / n as f64;
                weight * gini(&class_counts(partition), partition.len())
            })
            .sum();
        parent - weighted_children
    }
}
