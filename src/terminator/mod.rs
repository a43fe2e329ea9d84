//! Terminator trait and implementations for study-level early stopping.
//!
//! Terminators decide whether an entire optimization run should stop,
//! based on the accumulated trial history. They complement pruning (which
//! kills individual trials): once further search is statistically unlikely
//! to beat the best-found result, continuing to sample new configurations
//! only burns evaluation budget.
//!
//! The usual wiring is through a [`TerminatorCallback`] registered on the
//! study; the callback consults the terminator after every terminal trial
//! and requests [`Study::stop`](crate::Study::stop) on a `true` verdict.

mod callback;
mod erroreval;
mod gp;
mod improvement;
mod stagnation;

pub use callback::{DEFAULT_MIN_N_TRIALS, TerminatorCallback};
pub use erroreval::{CrossValidationErrorEvaluator, ErrorEvaluator, StaticErrorEvaluator};
pub use improvement::{ImprovementEvaluator, RegretBoundEvaluator};
pub use stagnation::StagnationTerminator;

use crate::error::{Error, Result};
use crate::study::Study;
use crate::trial::FinishedTrial;
use crate::types::{Direction, TrialState};

/// Trait for pluggable study-termination strategies.
///
/// A terminator is a pure function of the current trial history: the
/// history may grow between successive calls but never shrinks or mutates
/// retroactively, and the verdict must be consistent with whatever history
/// is visible at call time. Implementations must not mutate the study, must
/// tolerate repeated invocation on an unchanged history, and must return
/// `Ok(false)` — not an error — when the history holds too few completed
/// trials to judge.
///
/// The trait requires `Send + Sync` so verdicts can be requested from
/// concurrent trial-completion notifications.
///
/// # Implementing a custom terminator
///
/// ```
/// use terminator::prelude::*;
///
/// struct BudgetTerminator {
///     max_completed: usize,
/// }
///
/// impl Terminator for BudgetTerminator {
///     fn should_terminate(&self, study: &Study) -> Result<bool> {
///         Ok(study.n_trials() >= self.max_completed)
///     }
/// }
/// ```
pub trait Terminator: Send + Sync {
    /// Decide whether the study should stop sampling new trials.
    ///
    /// # Errors
    ///
    /// Implementations propagate statistical-evaluation failures (e.g. a
    /// surrogate fit that cannot be computed). Insufficient evidence is a
    /// `false` verdict, never an error.
    fn should_terminate(&self, study: &Study) -> Result<bool>;
}

/// Minimum completed trials before the regret-bound strategy can judge:
/// leave-one-out cross-validation needs at least two observations.
const MIN_COMPLETED_TRIALS: usize = 2;

/// The reference statistical termination strategy.
///
/// Terminates when the estimated improvement still obtainable from further
/// search (the *regret bound*, from an [`ImprovementEvaluator`]) is no
/// larger than the irreducible estimation error of the search itself (from
/// an [`ErrorEvaluator`]) — i.e. when further search can no longer be
/// statistically distinguished from noise.
///
/// # Examples
///
/// ```
/// use terminator::prelude::*;
///
/// // Default evaluators: GP regret bound vs. leave-one-out CV error
/// let strategy = RegretBoundTerminator::new();
///
/// // Deterministic noise floor instead of cross-validation
/// let strategy = RegretBoundTerminator::with_evaluators(
///     RegretBoundEvaluator::with_seed(42),
///     StaticErrorEvaluator::new(0.01),
/// );
/// ```
pub struct RegretBoundTerminator {
    improvement: Box<dyn ImprovementEvaluator>,
    error: Box<dyn ErrorEvaluator>,
}

impl RegretBoundTerminator {
    /// Create the reference strategy with default evaluators.
    #[must_use]
    pub fn new() -> Self {
        Self::with_evaluators(
            RegretBoundEvaluator::new(),
            CrossValidationErrorEvaluator::new(),
        )
    }

    /// Create the strategy from custom improvement and error evaluators.
    #[must_use]
    pub fn with_evaluators(
        improvement: impl ImprovementEvaluator + 'static,
        error: impl ErrorEvaluator + 'static,
    ) -> Self {
        Self {
            improvement: Box::new(improvement),
            error: Box::new(error),
        }
    }
}

impl Default for RegretBoundTerminator {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminator for RegretBoundTerminator {
    fn should_terminate(&self, study: &Study) -> Result<bool> {
        let completed = study.get_trials(Some(&[TrialState::Complete]));
        if completed.len() < MIN_COMPLETED_TRIALS {
            return Ok(false);
        }

        let direction = study.direction();
        let improvement = self.improvement.evaluate(&completed, direction)?;
        let error = self.error.evaluate(&completed, direction)?;
        trace_debug!(improvement, error, "regret bound evaluated");

        Ok(improvement <= error)
    }
}

/// Cap on the number of (most recent) trials used to fit the surrogate,
/// bounding the O(n³) per-invocation cost.
const MAX_TRAIN_TRIALS: usize = 100;

/// Build a normalized regression dataset from completed trials.
///
/// The feature dimensions are the parameter names of the first trial,
/// sorted for determinism; trials missing any of those parameters are
/// skipped. Each dimension is min-max normalized to `[0, 1]` over the
/// retained trials (a degenerate span maps to 0.5). Objective values are
/// negated for `Maximize` so downstream estimators always minimize. Uses
/// at most [`MAX_TRAIN_TRIALS`] most recent trials.
///
/// # Errors
///
/// Returns [`Error::InsufficientTrials`] if no usable trial remains.
pub(crate) fn regression_data(
    trials: &[FinishedTrial],
    direction: Direction,
) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    let start = trials.len().saturating_sub(MAX_TRAIN_TRIALS);
    let recent = &trials[start..];

    let Some(first) = recent.first() else {
        return Err(Error::InsufficientTrials {
            required: 1,
            got: 0,
        });
    };

    let mut names: Vec<&str> = first.params.keys().map(String::as_str).collect();
    names.sort_unstable();

    let mut x = Vec::with_capacity(recent.len());
    let mut y = Vec::with_capacity(recent.len());

    for trial in recent {
        let Some(value) = trial.value else { continue };
        let row: Option<Vec<f64>> = names
            .iter()
            .map(|name| trial.params.get(*name).copied())
            .collect();
        if let Some(row) = row {
            x.push(row);
            y.push(match direction {
                Direction::Minimize => value,
                Direction::Maximize => -value,
            });
        }
    }

    if x.is_empty() {
        return Err(Error::InsufficientTrials {
            required: 1,
            got: 0,
        });
    }

    // Min-max normalize each dimension to [0, 1]
    for j in 0..names.len() {
        let lo = x.iter().map(|row| row[j]).fold(f64::INFINITY, f64::min);
        let hi = x.iter().map(|row| row[j]).fold(f64::NEG_INFINITY, f64::max);
        let span = hi - lo;
        for row in &mut x {
            row[j] = if span.abs() < 1e-15 {
                0.5
            } else {
                (row[j] - lo) / span
            };
        }
    }

    Ok((x, y))
}
