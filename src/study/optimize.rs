use crate::types::TrialState;

use super::{Study, is_trial_pruned};

impl Study {
    /// Run up to `n_trials` sequential evaluations of an objective.
    ///
    /// Accepts any [`Objective`](crate::Objective) implementation, including
    /// plain closures (`Fn(&mut Trial) -> Result<f64, E>`) thanks to the
    /// blanket impl.
    ///
    /// The loop observes the stop flag between dispatches: once
    /// [`stop`](Self::stop) has been requested — by a registered
    /// [`StudyCallback`](crate::StudyCallback) or externally — no further
    /// trial is started. After every trial reaches a terminal state
    /// (`Complete`, `Failed`, or `Pruned`), all registered callbacks are
    /// invoked with the study and the finished trial; a callback error
    /// aborts the run with that error.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoCompletedTrials` if no trials completed
    /// successfully, or any error raised by a registered callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use terminator::{Direction, Study};
    ///
    /// let study = Study::new(Direction::Minimize);
    ///
    /// study
    ///     .optimize(10, |trial: &mut terminator::Trial| {
    ///         let x = trial.id() as f64 / 10.0;
    ///         trial.set_param("x", x);
    ///         Ok::<_, terminator::Error>(x * x)
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(study.n_trials(), 10);
    /// assert!(study.best_value().unwrap() >= 0.0);
    /// ```
    #[allow(clippy::needless_pass_by_value)]
    pub fn optimize(
        &self,
        n_trials: usize,
        objective: impl crate::objective::Objective,
    ) -> crate::Result<()> {
        #[cfg(feature = "tracing")]
        let _span =
            tracing::info_span!("optimize", n_trials, direction = ?self.direction).entered();

        for _ in 0..n_trials {
            if self.is_stopped() {
                break;
            }

            let mut trial = self.ask();
            #[cfg(feature = "tracing")]
            let trial_id = trial.id();

            match objective.evaluate(&mut trial) {
                Ok(value) => {
                    self.push_and_notify(trial.into_finished(Some(value), TrialState::Complete))?;
                    trace_info!(trial_id, "trial completed");
                }
                Err(e) if is_trial_pruned(&e) => {
                    self.push_and_notify(trial.into_finished(None, TrialState::Pruned))?;
                    trace_info!(trial_id, "trial pruned");
                }
                Err(e) => {
                    let _reason = e.to_string();
                    self.push_and_notify(trial.into_finished(None, TrialState::Failed))?;
                    trace_debug!(trial_id, reason = %_reason, "trial failed");
                }
            }
        }

        // Return error if no trials completed successfully
        if self.n_trials() == 0 {
            return Err(crate::Error::NoCompletedTrials);
        }

        Ok(())
    }
}
