//! Improvement estimation: how much could further search still gain?
//!
//! The reference [`RegretBoundEvaluator`] fits a GP surrogate to the
//! completed trials and measures the gap between the best observed value
//! and the lowest *lower confidence bound* the surrogate admits anywhere in
//! the (normalized) search space. If that gap is small, the best-so-far is
//! already close to the surrogate's optimistic optimum and further search
//! has little room left.

use core::f64::consts::PI;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::trial::FinishedTrial;
use crate::types::Direction;

use super::gp;
use super::regression_data;

/// Default number of random candidate points for the LCB search.
const DEFAULT_N_CANDIDATES: usize = 1000;
/// Default confidence parameter δ for the UCB/LCB width β.
const DEFAULT_DELTA: f64 = 0.1;

/// Trait for estimating the expected remaining improvement of a study.
///
/// Implementations receive the completed trials (in creation order) and
/// the study direction, and return a non-negative improvement estimate in
/// objective-value units.
pub trait ImprovementEvaluator: Send + Sync {
    /// Estimate how much the best-so-far value could still improve.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientTrials`] when `trials` holds no usable
    /// completed trial, or [`Error::SurrogateFit`] on numerical failure.
    fn evaluate(&self, trials: &[FinishedTrial], direction: Direction) -> Result<f64>;
}

/// GP-based regret-bound improvement estimator.
///
/// Fits a Gaussian Process to the completed trials (parameters min-max
/// normalized to `[0, 1]^d`, values negated for maximization) and computes
///
/// `improvement = max(0, best_observed − min LCB)`
///
/// where `LCB(x) = μ(x) − √β·σ(x)` is minimized over the training points
/// plus `n_candidates` uniform random points, and
/// `β = 2·ln(d·n²·π² / 6δ)` is the standard GP-UCB confidence width.
///
/// # Examples
///
/// ```
/// use terminator::prelude::*;
///
/// let evaluator = RegretBoundEvaluator::with_seed(42).n_candidates(500);
/// ```
pub struct RegretBoundEvaluator {
    n_candidates: usize,
    delta: f64,
    noise_variance: f64,
    rng: Mutex<fastrand::Rng>,
}

impl RegretBoundEvaluator {
    /// Create an evaluator with default settings and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new())
    }

    /// Create an evaluator with a fixed seed for reproducibility.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed))
    }

    fn from_rng(rng: fastrand::Rng) -> Self {
        Self {
            n_candidates: DEFAULT_N_CANDIDATES,
            delta: DEFAULT_DELTA,
            noise_variance: gp::DEFAULT_NOISE_VAR,
            rng: Mutex::new(rng),
        }
    }

    /// Set the number of random candidate points for the LCB search.
    ///
    /// Default: 1000.
    #[must_use]
    pub fn n_candidates(mut self, n: usize) -> Self {
        self.n_candidates = n;
        self
    }

    /// Set the confidence parameter δ of the bound width β.
    ///
    /// Smaller values widen the confidence band, making termination more
    /// conservative. Default: 0.1.
    #[must_use]
    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Set the observation noise variance of the GP surrogate.
    ///
    /// Default: 1e-6 (near-noiseless).
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = v;
        self
    }
}

impl Default for RegretBoundEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// GP-UCB confidence width `β = 2·ln(d·n²·π² / 6δ)`, clamped non-negative.
#[allow(clippy::cast_precision_loss)]
fn beta(dim: usize, n: usize, delta: f64) -> f64 {
    let dim = dim.max(1) as f64;
    let n = n as f64;
    (2.0 * (dim * n.powi(2) * PI.powi(2) / (6.0 * delta)).ln()).max(0.0)
}

impl ImprovementEvaluator for RegretBoundEvaluator {
    fn evaluate(&self, trials: &[FinishedTrial], direction: Direction) -> Result<f64> {
        let (x, y) = regression_data(trials, direction)?;
        let model = gp::fit(&x, &y, self.noise_variance)
            .ok_or(Error::SurrogateFit("cholesky factorization failed"))?;

        let d = x.first().map_or(0, Vec::len);
        let width = beta(d, y.len(), self.delta).sqrt();

        let lcb = |point: &[f64]| {
            let (mean, std) = model.predict(point);
            mean - width * std
        };

        // LCB search over the observed points...
        let mut min_lcb = x.iter().map(|row| lcb(row)).fold(f64::INFINITY, f64::min);

        // ...and over random points in the normalized search space.
        let mut rng = self.rng.lock();
        for _ in 0..self.n_candidates {
            let point: Vec<f64> = (0..d).map(|_| rng.f64()).collect();
            min_lcb = min_lcb.min(lcb(&point));
        }

        let best = y.iter().copied().fold(f64::INFINITY, f64::min);
        Ok((best - min_lcb).max(0.0))
    }
}
