#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a terminator callback is configured with a gate below 1.
    #[error("invalid min_n_trials: {got} (must be at least 1)")]
    InvalidMinTrials {
        /// The rejected gate value.
        got: usize,
    },

    /// Returned when an estimator is invoked with fewer trials than it needs.
    ///
    /// Termination strategies pre-check trial counts and turn this condition
    /// into a `false` verdict; the error surfaces only when an evaluator is
    /// called directly with insufficient data.
    #[error("insufficient trials: need at least {required}, got {got}")]
    InsufficientTrials {
        /// The minimum number of trials the estimator needs.
        required: usize,
        /// The number of trials it was given.
        got: usize,
    },

    /// Returned when fitting the surrogate model fails numerically.
    #[error("surrogate fit failed: {0}")]
    SurrogateFit(&'static str),

    /// Returned when requesting the best trial but no trials have completed.
    #[error("no completed trials available")]
    NoCompletedTrials,

    /// Returned when a trial is pruned (stopped early by the objective function).
    #[error("trial was pruned")]
    TrialPruned,

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;

/// Convenience type for signalling a pruned trial from an objective function.
///
/// Implements `Into<Error>` so it can be used with `?` in objectives that
/// return `Result<V, Error>`.
///
/// # Examples
///
/// ```
/// use terminator::{Error, TrialPruned};
///
/// fn objective_that_prunes() -> Result<f64, Error> {
///     // ... some computation ...
///     Err(TrialPruned)?
/// }
/// ```
#[derive(Debug)]
pub struct TrialPruned;

impl core::fmt::Display for TrialPruned {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "trial was pruned")
    }
}

impl From<TrialPruned> for Error {
    fn from(_: TrialPruned) -> Self {
        Error::TrialPruned
    }
}
