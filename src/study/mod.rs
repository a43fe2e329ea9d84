//! Study implementation: trial history, stop control, and callback wiring.

use core::any::Any;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::trial::{FinishedTrial, Trial};
use crate::types::{Direction, TrialState};

mod optimize;

/// Hook invoked by the optimization loop after every trial reaches a
/// terminal state.
///
/// Callbacks are registered with [`Study::add_callback`] and called with
/// the study and the just-finished trial, in registration order. A callback
/// returning an error aborts the optimization run with that error; the
/// trial history recorded up to that point remains valid and queryable.
///
/// Implementations must be `Send + Sync` because trials may finish on
/// multiple threads.
pub trait StudyCallback: Send + Sync {
    /// Called once per trial after it reaches `Complete`, `Failed`, or
    /// `Pruned`.
    ///
    /// # Errors
    ///
    /// Any error returned here propagates out of the optimization loop.
    fn on_trial_finished(&self, study: &Study, trial: &FinishedTrial) -> Result<()>;
}

/// A study manages one optimization run: an append-only, ordered trial
/// history, the optimization direction, a cooperative stop flag, and the
/// per-trial callbacks.
///
/// The study is the only shared mutable resource of the termination engine.
/// Terminators and callbacks read it; only the loop (and the low-level
/// `tell`/`complete_trial` family) writes to it. Trial IDs are unique and
/// strictly increasing in creation order, and a terminal state never
/// changes once recorded.
///
/// # Examples
///
/// ```
/// use terminator::{Direction, Study};
///
/// let study = Study::new(Direction::Minimize);
/// assert_eq!(study.direction(), Direction::Minimize);
/// ```
pub struct Study {
    /// The optimization direction.
    direction: Direction,
    /// Terminal trial records in creation order.
    trials: Arc<RwLock<Vec<FinishedTrial>>>,
    /// Counter for the next trial ID.
    next_id: AtomicU64,
    /// Cooperative stop flag; once set it is never cleared.
    stopped: AtomicBool,
    /// Callbacks invoked after each terminal trial.
    callbacks: RwLock<Vec<Arc<dyn StudyCallback>>>,
}

impl Study {
    /// Create a new study with the given optimization direction.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            trials: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Create a study that minimizes the objective value.
    #[must_use]
    pub fn minimize() -> Self {
        Self::new(Direction::Minimize)
    }

    /// Create a study that maximizes the objective value.
    #[must_use]
    pub fn maximize() -> Self {
        Self::new(Direction::Maximize)
    }

    /// Return the optimization direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Register a callback to be invoked after every terminal trial.
    ///
    /// Callbacks fire from the `optimize` loop only; the low-level
    /// [`tell`](Self::tell)/[`complete_trial`](Self::complete_trial) family
    /// records trials without notification.
    ///
    /// # Examples
    ///
    /// ```
    /// use terminator::prelude::*;
    ///
    /// let study = Study::minimize();
    /// let cb = TerminatorCallback::new(StagnationTerminator::new(30), 10)?;
    /// study.add_callback(cb);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn add_callback(&self, callback: impl StudyCallback + 'static) {
        self.callbacks.write().push(Arc::new(callback));
    }

    /// Request that no further trials be dispatched.
    ///
    /// This is a request, not an instantaneous halt: trials already in
    /// flight are allowed to finish, and the loop observes the flag between
    /// dispatches. Safe to call from any thread and any number of times.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        trace_info!("study stop requested");
    }

    /// Returns `true` once [`stop`](Self::stop) has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Create a new running trial with a unique ID.
    ///
    /// # Examples
    ///
    /// ```
    /// use terminator::Study;
    ///
    /// let study = Study::minimize();
    /// assert_eq!(study.ask().id(), 0);
    /// assert_eq!(study.ask().id(), 1);
    /// ```
    #[must_use]
    pub fn ask(&self) -> Trial {
        Trial::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Report the result of a trial obtained from [`ask()`](Self::ask).
    ///
    /// Pass `Ok(value)` for a successful evaluation or `Err(reason)` for a
    /// failure. Failed trials are recorded without a value.
    pub fn tell(&self, trial: Trial, value: core::result::Result<f64, impl ToString>) {
        match value {
            Ok(v) => self.complete_trial(trial, v),
            Err(e) => self.fail_trial(trial, e),
        }
    }

    /// Record a completed trial with its objective value.
    pub fn complete_trial(&self, trial: Trial, value: f64) {
        self.push(trial.into_finished(Some(value), TrialState::Complete));
    }

    /// Record a failed trial.
    ///
    /// Failed trials keep their place in the history (so ordinals stay
    /// contiguous) but carry no objective value and never count toward
    /// [`n_trials`](Self::n_trials).
    pub fn fail_trial(&self, trial: Trial, _error: impl ToString) {
        self.push(trial.into_finished(None, TrialState::Failed));
    }

    /// Record a pruned trial.
    pub fn prune_trial(&self, trial: Trial) {
        self.push(trial.into_finished(None, TrialState::Pruned));
    }

    /// Return terminal trials in creation order, optionally filtered by state.
    ///
    /// `None` returns every terminal trial. The returned vector is a
    /// point-in-time snapshot; trials recorded afterwards are not visible
    /// through it.
    ///
    /// # Examples
    ///
    /// ```
    /// use terminator::{Study, TrialState};
    ///
    /// let study = Study::minimize();
    /// let trial = study.ask();
    /// study.complete_trial(trial, 0.5);
    ///
    /// assert_eq!(study.get_trials(None).len(), 1);
    /// assert_eq!(study.get_trials(Some(&[TrialState::Failed])).len(), 0);
    /// ```
    #[must_use]
    pub fn get_trials(&self, states: Option<&[TrialState]>) -> Vec<FinishedTrial> {
        let trials = self.trials.read();
        match states {
            None => trials.clone(),
            Some(states) => trials
                .iter()
                .filter(|t| states.contains(&t.state))
                .cloned()
                .collect(),
        }
    }

    /// Return the number of completed trials.
    ///
    /// Failed and pruned trials are not counted.
    #[must_use]
    pub fn n_trials(&self) -> usize {
        self.trials
            .read()
            .iter()
            .filter(|t| t.state == TrialState::Complete)
            .count()
    }

    /// Return the best completed trial according to the study direction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCompletedTrials`] if no trial has completed.
    pub fn best_trial(&self) -> Result<FinishedTrial> {
        let trials = self.trials.read();
        let direction = self.direction;
        trials
            .iter()
            .filter(|t| t.state == TrialState::Complete)
            .max_by(|a, b| Self::compare_values(a.value, b.value, direction))
            .cloned()
            .ok_or(Error::NoCompletedTrials)
    }

    /// Return the best completed objective value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCompletedTrials`] if no trial has completed.
    pub fn best_value(&self) -> Result<f64> {
        self.best_trial()?
            .value
            .ok_or(Error::Internal("completed trial without value"))
    }

    /// Append a terminal record to the history.
    pub(crate) fn push(&self, finished: FinishedTrial) {
        self.trials.write().push(finished);
    }

    /// Append a terminal record and fire the registered callbacks.
    ///
    /// Callbacks are cloned out of the registry before invocation so a
    /// callback may itself register further callbacks without deadlocking.
    pub(crate) fn push_and_notify(&self, finished: FinishedTrial) -> Result<()> {
        self.push(finished.clone());
        let callbacks: Vec<Arc<dyn StudyCallback>> = self.callbacks.read().clone();
        for callback in callbacks {
            callback.on_trial_finished(self, &finished)?;
        }
        Ok(())
    }

    /// Rank two optional objective values so that `max_by` picks the better
    /// one for the given direction. Missing values always rank worst.
    fn compare_values(
        a: Option<f64>,
        b: Option<f64>,
        direction: Direction,
    ) -> core::cmp::Ordering {
        let (Some(a), Some(b)) = (a, b) else {
            return a
                .is_some()
                .cmp(&b.is_some());
        };
        let ordering = a.partial_cmp(&b);
        match direction {
            Direction::Minimize => {
                ordering.map_or(core::cmp::Ordering::Equal, core::cmp::Ordering::reverse)
            }
            Direction::Maximize => ordering.unwrap_or(core::cmp::Ordering::Equal),
        }
    }
}

/// Returns `true` if the error represents a pruned trial.
///
/// Checks via `Any` downcasting whether `e` is `Error::TrialPruned` or
/// the standalone `TrialPruned` struct.
pub(crate) fn is_trial_pruned<E: 'static>(e: &E) -> bool {
    let any: &dyn Any = e;
    if let Some(err) = any.downcast_ref::<crate::Error>() {
        matches!(err, crate::Error::TrialPruned)
    } else {
        any.downcast_ref::<crate::error::TrialPruned>().is_some()
    }
}
