//! Polynomial kernel over hyperplanes.

use serde::{Deserialize, Serialize};

use super::{Hyperplane, Instance};
use crate::{Error, Result};

/// `K(h, x) = (coef0 + gamma * <h, x>)^degree`, or plain `<h, x>` at degree 0.
///
/// The kernel is applied to the aggregated hyperplane, not to each stored
/// example, so it approximates the kernelized voted perceptron. At degree 0
/// the averaged mode is exactly the classical averaged perceptron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolynomialKernel {
    degree: u32,
    coef0: f64,
    gamma: f64,
}

impl Default for PolynomialKernel {
    fn default() -> Self {
        Self {
            degree: 3,
            coef0: 1.0,
            gamma: 10.0,
        }
    }
}

impl PolynomialKernel {
    /// Kernel with the given parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a negative or oversized degree.
    pub fn new(degree: i64, coef0: f64, gamma: f64) -> Result<Self> {
        let degree = i32::try_from(degree)
            .ok()
            .filter(|d| *d >= 0)
            .ok_or_else(|| Error::config(format!("kernel degree must be >= 0, got {}", degree)))?;
        Ok(Self {
            degree: degree.unsigned_abs(),
            coef0,
            gamma,
        })
    }

    /// The degree-0 (linear) kernel.
    #[must_use]
    pub fn linear() -> Self {
        Self {
            degree: 0,
            ..Self::default()
        }
    }

    /// Polynomial degree; 0 means linear.
    #[must_use]
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Additive constant.
    #[must_use]
    pub fn coef0(&self) -> f64 {
        self.coef0
    }

    /// Scale applied to the dot product.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Evaluate the kernel between `h` and `x`.
    #[must_use]
    pub fn eval(&self, h: &Hyperplane, x: &Instance) -> f64 {
        let score = h.score(x);
        if self.degree == 0 {
            return score;
        }
        // degree fits i32: checked in `new`
        (self.coef0 + self.gamma * score).powi(self.degree as i32)
    }
}
