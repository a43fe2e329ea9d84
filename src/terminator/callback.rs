use crate::error::{Error, Result};
use crate::study::{Study, StudyCallback};
use crate::trial::FinishedTrial;

use super::Terminator;

/// Default minimum number of completed trials before termination is
/// considered.
pub const DEFAULT_MIN_N_TRIALS: usize = 20;

/// Adapter wiring a [`Terminator`] into the per-trial lifecycle of a study.
///
/// Registered via [`Study::add_callback`], the callback runs after every
/// trial reaches a terminal state. It enforces a warm-up gate — the wrapped
/// terminator is never consulted while fewer than `min_n_trials` trials
/// have **completed** (failed and pruned trials do not count) — and
/// requests [`Study::stop`] on a `true` verdict.
///
/// The stop request is idempotent, so concurrent trial completions may each
/// trigger the callback safely. Errors raised by the terminator are not
/// suppressed: they propagate out of the optimization loop, aborting the
/// run loudly rather than silently continuing or silently stopping.
///
/// # Examples
///
/// ```
/// use terminator::prelude::*;
///
/// let study = Study::minimize();
/// study.add_callback(TerminatorCallback::new(RegretBoundTerminator::new(), 25)?);
/// # Ok::<(), Error>(())
/// ```
pub struct TerminatorCallback {
    terminator: Box<dyn Terminator>,
    min_n_trials: usize,
}

impl TerminatorCallback {
    /// Create a callback gated on at least `min_n_trials` completed trials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMinTrials`] if `min_n_trials` is 0.
    pub fn new(terminator: impl Terminator + 'static, min_n_trials: usize) -> Result<Self> {
        if min_n_trials < 1 {
            return Err(Error::InvalidMinTrials { got: min_n_trials });
        }
        Ok(Self {
            terminator: Box::new(terminator),
            min_n_trials,
        })
    }

    /// Create a callback with the default gate of
    /// [`DEFAULT_MIN_N_TRIALS`] completed trials.
    #[must_use]
    pub fn with_default_gate(terminator: impl Terminator + 'static) -> Self {
        Self {
            terminator: Box::new(terminator),
            min_n_trials: DEFAULT_MIN_N_TRIALS,
        }
    }

    /// Return the configured warm-up gate.
    #[must_use]
    pub fn min_n_trials(&self) -> usize {
        self.min_n_trials
    }
}

impl StudyCallback for TerminatorCallback {
    fn on_trial_finished(&self, study: &Study, _trial: &FinishedTrial) -> Result<()> {
        let n_complete = study.n_trials();
        if n_complete < self.min_n_trials {
            return Ok(());
        }

        if self.terminator.should_terminate(study)? {
            trace_info!(n_complete, "terminator requested study stop");
            study.stop();
        }
        Ok(())
    }
}
