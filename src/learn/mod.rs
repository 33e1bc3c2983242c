//! Online binary classification.
//!
//! - [`Instance`]: sparse feature vector
//! - [`Example`]: instance plus a ±1 label
//! - [`Hyperplane`]: sparse weight vector
//! - [`KernelVotedPerceptron`]: voted/averaged perceptron with an optional
//!   polynomial kernel
//!
//! Learners implement [`OnlineBinaryLearner`]; what they hand back implements
//! [`Classifier`].
//!
//! ```rust
//! use spanlab::learn::{Example, Instance, KernelVotedPerceptron, KvpConfig, OnlineBinaryLearner, Classifier, VotingMode};
//!
//! let config = KvpConfig::default().with_degree(0).with_mode(VotingMode::Averaged);
//! let mut learner = KernelVotedPerceptron::new(config).unwrap();
//! learner.add_example(&Example::positive(Instance::new().with("f1", 1.0)));
//! learner.add_example(&Example::negative(Instance::new().with("f2", 1.0)));
//!
//! let classifier = learner.get_classifier();
//! assert!(classifier.classification(&Instance::new().with("f1", 1.0)).is_positive());
//! ```

mod dataset;
mod hyperplane;
mod kernel;
mod kvp;

pub use dataset::{accuracy, load_examples, parse_examples};
pub use hyperplane::Hyperplane;
pub use kernel::PolynomialKernel;
pub use kvp::{KernelVotedPerceptron, KvpClassifier, KvpConfig, SupportVector, VotingMode};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque feature identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature(String);

impl Feature {
    /// Create a feature.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Feature name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Feature {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Feature {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sparse feature vector. Missing features are zero.
///
/// Features iterate in sorted order, which keeps floating-point sums
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    features: BTreeMap<Feature, f64>,
}

impl Instance {
    /// Empty instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Instance::set`].
    #[must_use]
    pub fn with(mut self, feature: impl Into<Feature>, value: f64) -> Self {
        self.set(feature, value);
        self
    }

    /// Set a feature value, replacing any previous one.
    pub fn set(&mut self, feature: impl Into<Feature>, value: f64) {
        self.features.insert(feature.into(), value);
    }

    /// Value of `feature`, zero if absent.
    #[must_use]
    pub fn get(&self, feature: &Feature) -> f64 {
        self.features.get(feature).copied().unwrap_or(0.0)
    }

    /// Non-zero entries in feature order.
    pub fn iter(&self) -> impl Iterator<Item = (&Feature, f64)> + '_ {
        self.features.iter().map(|(f, v)| (f, *v))
    }

    /// Number of stored features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if no feature is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<F: Into<Feature>> FromIterator<(F, f64)> for Instance {
    fn from_iter<I: IntoIterator<Item = (F, f64)>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().map(|(f, v)| (f.into(), v)).collect(),
        }
    }
}

/// Binary class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryLabel {
    /// +1
    Positive,
    /// -1
    Negative,
}

impl BinaryLabel {
    /// `+1.0` or `-1.0`.
    #[must_use]
    pub const fn numeric(&self) -> f64 {
        match self {
            BinaryLabel::Positive => 1.0,
            BinaryLabel::Negative => -1.0,
        }
    }
}

/// A labeled instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// Feature vector
    pub instance: Instance,
    /// True class
    pub label: BinaryLabel,
}

impl Example {
    /// Create an example.
    #[must_use]
    pub fn new(instance: Instance, label: BinaryLabel) -> Self {
        Self { instance, label }
    }

    /// Positive example.
    #[must_use]
    pub fn positive(instance: Instance) -> Self {
        Self::new(instance, BinaryLabel::Positive)
    }

    /// Negative example.
    #[must_use]
    pub fn negative(instance: Instance) -> Self {
        Self::new(instance, BinaryLabel::Negative)
    }
}

/// A predicted class with its raw score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassLabel {
    /// Predicted class
    pub label: BinaryLabel,
    /// Decision value the class was derived from
    pub weight: f64,
}

impl ClassLabel {
    /// Label for a decision value: positive when `score >= 0`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let label = if score >= 0.0 {
            BinaryLabel::Positive
        } else {
            BinaryLabel::Negative
        };
        Self {
            label,
            weight: score,
        }
    }

    /// True for the positive class.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.label == BinaryLabel::Positive
    }
}

/// Something that scores instances.
pub trait Classifier {
    /// Raw decision value.
    fn score(&self, instance: &Instance) -> f64;

    /// Class for `instance`. A score of exactly zero is positive.
    fn classification(&self, instance: &Instance) -> ClassLabel {
        ClassLabel::from_score(self.score(instance))
    }
}

/// A learner consuming labeled examples one at a time.
pub trait OnlineBinaryLearner {
    /// What [`OnlineBinaryLearner::get_classifier`] returns.
    type Classifier: Classifier;

    /// Forget everything learned so far.
    fn reset(&mut self);

    /// Update on one example.
    fn add_example(&mut self, example: &Example);

    /// Freeze the current model. Later training must not affect the result.
    fn get_classifier(&self) -> Self::Classifier;

    /// Update on a stream of examples, in order.
    fn add_examples<'a, I>(&mut self, examples: I)
    where
        I: IntoIterator<Item = &'a Example>,
        Self: Sized,
    {
        for example in examples {
            self.add_example(example);
        }
    }
}
