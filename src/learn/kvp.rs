//! Kernel voted perceptron.
//!
//! Training keeps a live hyperplane and a survival counter. Each mistake
//! pushes `(copy of live hyperplane, survival count)` onto the history and
//! moves the live hyperplane toward the example. Prediction aggregates the
//! history, either by counting kernel-sign votes ([`VotingMode::Voted`]) or
//! by summing count-weighted kernel values ([`VotingMode::Averaged`]).
//!
//! The live hyperplane is not part of the history until its next mistake,
//! so a classifier frozen mid-stream ignores it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{Classifier, Example, Hyperplane, Instance, OnlineBinaryLearner, PolynomialKernel};
use crate::{Error, Result};

/// Default cap on the support vectors consulted when speedup is on.
pub const DEFAULT_MAX_VECTORS: usize = 300;

/// How history entries are combined at prediction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingMode {
    /// `Σ count · sign(k)`, with `sign(0) = -1`
    #[default]
    Voted,
    /// `Σ count · k`
    Averaged,
}

impl VotingMode {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            VotingMode::Voted => "voted",
            VotingMode::Averaged => "averaged",
        }
    }
}

impl fmt::Display for VotingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VotingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("voted") {
            Ok(VotingMode::Voted)
        } else if s.eq_ignore_ascii_case("averaged") {
            Ok(VotingMode::Averaged)
        } else {
            Err(Error::config(format!(
                "unknown voting mode '{}' (expected voted or averaged)",
                s
            )))
        }
    }
}

/// One history entry: a frozen hyperplane and how many examples it survived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportVector {
    /// Hypothesis at the moment it was displaced
    pub hyperplane: Hyperplane,
    /// Consecutive examples it classified correctly
    pub count: usize,
}

/// Learner hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KvpConfig {
    /// Polynomial degree; 0 disables the kernel
    pub degree: i64,
    /// Kernel additive constant
    pub coef0: f64,
    /// Kernel dot-product scale
    pub gamma: f64,
    /// Aggregation rule
    pub mode: VotingMode,
    /// Only consult the last `max_vectors` history entries
    pub speedup: bool,
    /// Cap used when `speedup` is on
    pub max_vectors: usize,
}

impl Default for KvpConfig {
    fn default() -> Self {
        let kernel = PolynomialKernel::default();
        Self {
            degree: i64::from(kernel.degree()),
            coef0: kernel.coef0(),
            gamma: kernel.gamma(),
            mode: VotingMode::default(),
            speedup: false,
            max_vectors: DEFAULT_MAX_VECTORS,
        }
    }
}

impl KvpConfig {
    /// Set the kernel degree.
    #[must_use]
    pub fn with_degree(mut self, degree: i64) -> Self {
        self.degree = degree;
        self
    }

    /// Set the kernel constant.
    #[must_use]
    pub fn with_coef0(mut self, coef0: f64) -> Self {
        self.coef0 = coef0;
        self
    }

    /// Set the kernel scale.
    #[must_use]
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the aggregation rule.
    #[must_use]
    pub fn with_mode(mut self, mode: VotingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable speedup.
    #[must_use]
    pub fn with_speedup(mut self, speedup: bool) -> Self {
        self.speedup = speedup;
        self
    }

    /// Set the speedup cap.
    #[must_use]
    pub fn with_max_vectors(mut self, max_vectors: usize) -> Self {
        self.max_vectors = max_vectors;
        self
    }

    /// Kernel described by this config.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for a negative degree.
    pub fn kernel(&self) -> Result<PolynomialKernel> {
        PolynomialKernel::new(self.degree, self.coef0, self.gamma)
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for a negative degree or `max_vectors == 0`.
    pub fn validate(&self) -> Result<()> {
        self.kernel()?;
        if self.max_vectors == 0 {
            return Err(Error::config("max_vectors must be positive"));
        }
        Ok(())
    }
}

/// Online trainer.
///
/// ```
/// use spanlab::learn::{Example, Instance, KernelVotedPerceptron, KvpConfig, OnlineBinaryLearner};
///
/// let mut kvp = KernelVotedPerceptron::new(KvpConfig::default().with_degree(0)).unwrap();
/// kvp.add_example(&Example::positive(Instance::new().with("f1", 1.0)));
/// assert_eq!(kvp.history().len(), 1);
/// assert_eq!(kvp.run(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct KernelVotedPerceptron {
    config: KvpConfig,
    kernel: PolynomialKernel,
    current: Hyperplane,
    run: usize,
    history: Arc<Vec<SupportVector>>,
}

impl Default for KernelVotedPerceptron {
    fn default() -> Self {
        Self {
            config: KvpConfig::default(),
            kernel: PolynomialKernel::default(),
            current: Hyperplane::new(),
            run: 0,
            history: Arc::new(Vec::new()),
        }
    }
}

impl KernelVotedPerceptron {
    /// Untrained learner.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `config` does not validate.
    pub fn new(config: KvpConfig) -> Result<Self> {
        config.validate()?;
        let kernel = config.kernel()?;
        Ok(Self {
            config,
            kernel,
            ..Self::default()
        })
    }

    /// Hyperparameters.
    #[must_use]
    pub fn config(&self) -> &KvpConfig {
        &self.config
    }

    /// Live hyperplane.
    #[must_use]
    pub fn current(&self) -> &Hyperplane {
        &self.current
    }

    /// Examples survived by the live hyperplane.
    #[must_use]
    pub fn run(&self) -> usize {
        self.run
    }

    /// Snapshots taken so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[SupportVector] {
        &self.history
    }

    /// Examples consumed since the last reset.
    #[must_use]
    pub fn examples_seen(&self) -> usize {
        self.history.iter().map(|sv| sv.count).sum::<usize>() + self.run
    }
}

impl OnlineBinaryLearner for KernelVotedPerceptron {
    type Classifier = KvpClassifier;

    fn reset(&mut self) {
        self.current = Hyperplane::new();
        self.run = 0;
        self.history = Arc::new(Vec::new());
    }

    fn add_example(&mut self, example: &Example) {
        let y = example.label.numeric();
        let score = self.kernel.eval(&self.current, &example.instance);
        if score * y <= 0.0 {
            // Frozen classifiers keep the old list; make_mut copies only then.
            Arc::make_mut(&mut self.history).push(SupportVector {
                hyperplane: self.current.clone(),
                count: self.run,
            });
            self.current.increment(&example.instance, y);
            self.run = 1;
        } else {
            self.run += 1;
        }
    }

    fn get_classifier(&self) -> KvpClassifier {
        log::debug!(
            "freezing {} with {} support vectors (mode={}, degree={})",
            self,
            self.history.len(),
            self.config.mode,
            self.kernel.degree()
        );
        KvpClassifier {
            history: Arc::clone(&self.history),
            kernel: self.kernel,
            mode: self.config.mode,
            speedup: self.config.speedup,
            max_vectors: self.config.max_vectors,
        }
    }
}

impl fmt::Display for KernelVotedPerceptron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Kernel Voted Perceptron")
    }
}

/// Frozen model returned by [`KernelVotedPerceptron::get_classifier`].
///
/// Holds the history as of the freeze; further training is invisible to it.
#[derive(Debug, Clone)]
pub struct KvpClassifier {
    history: Arc<Vec<SupportVector>>,
    kernel: PolynomialKernel,
    mode: VotingMode,
    speedup: bool,
    max_vectors: usize,
}

impl KvpClassifier {
    /// Entries consulted at prediction time.
    #[must_use]
    pub fn active_vectors(&self) -> &[SupportVector] {
        let start = if self.speedup {
            self.history.len().saturating_sub(self.max_vectors)
        } else {
            0
        };
        &self.history[start..]
    }

    /// All frozen entries, oldest first.
    #[must_use]
    pub fn support_vectors(&self) -> &[SupportVector] {
        &self.history
    }

    /// Aggregation rule.
    #[must_use]
    pub fn mode(&self) -> VotingMode {
        self.mode
    }

    /// Raw decision value for `instance`.
    #[must_use]
    pub fn decision(&self, instance: &Instance) -> f64 {
        self.active_vectors()
            .iter()
            .map(|sv| {
                let k = self.kernel.eval(&sv.hyperplane, instance);
                let c = sv.count as f64;
                match self.mode {
                    VotingMode::Voted => c * if k > 0.0 { 1.0 } else { -1.0 },
                    VotingMode::Averaged => c * k,
                }
            })
            .sum()
    }
}

impl Classifier for KvpClassifier {
    fn score(&self, instance: &Instance) -> f64 {
        self.decision(instance)
    }
}

impl fmt::Display for KvpClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Kernel Voted Perceptron ({} support vectors, {})",
            self.history.len(),
            self.mode
        )
    }
}
