//! Error estimation: the noise floor of the current best estimate.
//!
//! The reference [`CrossValidationErrorEvaluator`] measures how well the GP
//! surrogate actually predicts held-out trials. If the remaining
//! improvement estimated by the improvement evaluator is within this
//! prediction error, further search cannot be told apart from noise.

use crate::error::{Error, Result};
use crate::trial::FinishedTrial;
use crate::types::Direction;

use super::gp;
use super::regression_data;

/// Default cap on the number of (most recent) trials refitted per
/// invocation. Leave-one-out refitting is O(n⁴) in the uncapped case.
const DEFAULT_MAX_CV_TRIALS: usize = 50;

/// Minimum trials needed for leave-one-out cross-validation.
const MIN_CV_TRIALS: usize = 2;

/// Trait for estimating the statistical uncertainty of the search.
///
/// Implementations return an error magnitude in objective-value units,
/// comparable to an [`ImprovementEvaluator`](super::ImprovementEvaluator)
/// estimate over the same trials.
pub trait ErrorEvaluator: Send + Sync {
    /// Estimate the irreducible prediction error over the given trials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientTrials`] when `trials` holds fewer
    /// usable observations than the procedure needs, or
    /// [`Error::SurrogateFit`] on numerical failure.
    fn evaluate(&self, trials: &[FinishedTrial], direction: Direction) -> Result<f64>;
}

/// Leave-one-out cross-validation error estimator.
///
/// For each retained trial, refits the GP surrogate on the remaining
/// trials, predicts the held-out observation, and aggregates the absolute
/// residuals into their median — a robust central estimate of how far the
/// surrogate's predictions are from reality.
///
/// # Examples
///
/// ```
/// use terminator::prelude::*;
///
/// let evaluator = CrossValidationErrorEvaluator::new().max_cv_trials(30);
/// ```
pub struct CrossValidationErrorEvaluator {
    noise_variance: f64,
    max_cv_trials: usize,
}

impl CrossValidationErrorEvaluator {
    /// Create an evaluator with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            noise_variance: gp::DEFAULT_NOISE_VAR,
            max_cv_trials: DEFAULT_MAX_CV_TRIALS,
        }
    }

    /// Set the observation noise variance of the refitted surrogates.
    ///
    /// Default: 1e-6.
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = v;
        self
    }

    /// Set the cap on trials refitted per invocation.
    ///
    /// Only the most recent trials up to this cap participate in the
    /// cross-validation. Default: 50.
    #[must_use]
    pub fn max_cv_trials(mut self, n: usize) -> Self {
        self.max_cv_trials = n.max(MIN_CV_TRIALS);
        self
    }
}

impl Default for CrossValidationErrorEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorEvaluator for CrossValidationErrorEvaluator {
    fn evaluate(&self, trials: &[FinishedTrial], direction: Direction) -> Result<f64> {
        let (x, y) = regression_data(trials, direction)?;
        let n = y.len();
        if n < MIN_CV_TRIALS {
            return Err(Error::InsufficientTrials {
                required: MIN_CV_TRIALS,
                got: n,
            });
        }

        // Keep only the most recent trials to bound refitting cost.
        let start = n.saturating_sub(self.max_cv_trials);
        let x = &x[start..];
        let y = &y[start..];
        let n = y.len();

        let mut residuals = Vec::with_capacity(n);
        for held_out in 0..n {
            let mut x_rest = Vec::with_capacity(n - 1);
            let mut y_rest = Vec::with_capacity(n - 1);
            for i in 0..n {
                if i != held_out {
                    x_rest.push(x[i].clone());
                    y_rest.push(y[i]);
                }
            }

            let model = gp::fit(&x_rest, &y_rest, self.noise_variance)
                .ok_or(Error::SurrogateFit("cholesky factorization failed"))?;
            let (predicted, _) = model.predict(&x[held_out]);
            residuals.push((y[held_out] - predicted).abs());
        }

        Ok(median(&mut residuals))
    }
}

/// A fixed, configuration-supplied noise floor.
///
/// Stands in for cross-validation when the objective's noise level is
/// known a priori, and doubles as a deterministic hook in tests.
///
/// # Examples
///
/// ```
/// use terminator::prelude::*;
///
/// let strategy = RegretBoundTerminator::with_evaluators(
///     RegretBoundEvaluator::new(),
///     StaticErrorEvaluator::new(0.05),
/// );
/// ```
pub struct StaticErrorEvaluator {
    constant: f64,
}

impl StaticErrorEvaluator {
    /// Create an evaluator that always reports the given error magnitude.
    #[must_use]
    pub fn new(constant: f64) -> Self {
        Self { constant }
    }
}

impl ErrorEvaluator for StaticErrorEvaluator {
    fn evaluate(&self, _trials: &[FinishedTrial], _direction: Direction) -> Result<f64> {
        Ok(self.constant)
    }
}

/// Compute the median of a non-empty slice. Sorts the slice in place.
fn median(values: &mut [f64]) -> f64 {
    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
    let len = values.len();
    if len % 2 == 1 {
        values[len / 2]
    } else {
        f64::midpoint(values[len / 2 - 1], values[len / 2])
    }
}
