//! Sparse linear weight vectors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Classifier, Feature, Instance};

/// A map from feature to weight; missing features weigh zero.
///
/// A value type: `clone()` is a deep copy, which is what the perceptron
/// relies on when it snapshots its running hypothesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hyperplane {
    weights: BTreeMap<Feature, f64>,
}

impl Hyperplane {
    /// The zero hyperplane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight of `feature`.
    #[must_use]
    pub fn weight(&self, feature: &Feature) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    /// Dot product with `instance` over the shared features.
    #[must_use]
    pub fn score(&self, instance: &Instance) -> f64 {
        instance
            .iter()
            .map(|(feature, value)| self.weight(feature) * value)
            .sum()
    }

    /// `self += scale * instance`.
    pub fn increment(&mut self, instance: &Instance, scale: f64) {
        for (feature, value) in instance.iter() {
            *self.weights.entry(feature.clone()).or_insert(0.0) += scale * value;
        }
    }

    /// `self += other`, pointwise.
    pub fn increment_hyperplane(&mut self, other: &Hyperplane) {
        for (feature, weight) in &other.weights {
            *self.weights.entry(feature.clone()).or_insert(0.0) += weight;
        }
    }

    /// Stored weights in feature order (explicit zeros included).
    pub fn weights(&self) -> impl Iterator<Item = (&Feature, f64)> + '_ {
        self.weights.iter().map(|(f, w)| (f, *w))
    }

    /// Number of stored weights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True if no weight has ever been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Classifier for Hyperplane {
    fn score(&self, instance: &Instance) -> f64 {
        Hyperplane::score(self, instance)
    }
}
