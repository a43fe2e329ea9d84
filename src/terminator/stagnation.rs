use crate::error::Result;
use crate::study::Study;
use crate::types::{Direction, TrialState};

use super::Terminator;

/// Terminate when the best value has stopped improving.
///
/// A cheap, model-free strategy: the study stops once `patience` completed
/// trials in a row have failed to strictly improve on the best value seen
/// before them. Useful when fitting a surrogate is too costly or the
/// parameter space is opaque.
///
/// # Examples
///
/// ```
/// use terminator::prelude::*;
///
/// // Stop after 30 completed trials without a new best
/// let strategy = StagnationTerminator::new(30);
/// ```
pub struct StagnationTerminator {
    /// Completed trials without improvement before terminating.
    patience: usize,
}

impl StagnationTerminator {
    /// Create a terminator with the given patience window.
    ///
    /// A `patience` of 0 terminates as soon as any trial has completed.
    #[must_use]
    pub fn new(patience: usize) -> Self {
        Self { patience }
    }
}

impl Terminator for StagnationTerminator {
    fn should_terminate(&self, study: &Study) -> Result<bool> {
        let completed = study.get_trials(Some(&[TrialState::Complete]));
        let direction = study.direction();

        let mut best: Option<f64> = None;
        let mut since_improvement = 0usize;

        for trial in &completed {
            let Some(value) = trial.value else { continue };
            let improved = best.is_none_or(|b| match direction {
                Direction::Minimize => value < b,
                Direction::Maximize => value > b,
            });
            if improved {
                best = Some(value);
                since_improvement = 0;
            } else {
                since_improvement += 1;
            }
        }

        Ok(best.is_some() && since_improvement >= self.patience)
    }
}
