//! The [`Objective`] trait defines what gets evaluated per trial.
//!
//! For simple closures, pass them directly to
//! [`Study::optimize`](crate::Study::optimize):
//!
//! ```
//! use terminator::prelude::*;
//!
//! let study = Study::minimize();
//!
//! study
//!     .optimize(50, |trial: &mut Trial| {
//!         let x = trial.id() as f64 / 50.0;
//!         trial.set_param("x", x);
//!         Ok::<_, Error>((x - 0.7).powi(2))
//!     })
//!     .unwrap();
//! ```
//!
//! Loop control — stopping the whole study early — is not an objective
//! concern here: register a [`StudyCallback`](crate::StudyCallback) (for
//! example a [`TerminatorCallback`](crate::terminator::TerminatorCallback))
//! on the study instead.

use crate::trial::Trial;

/// Defines an objective function evaluated once per trial.
///
/// The objective samples or receives a candidate configuration, records it
/// on the trial via [`Trial::set_param`], and returns the measured value.
/// Return `Err(TrialPruned)` to record the trial as pruned rather than
/// failed.
pub trait Objective {
    /// The error type returned by [`evaluate`](Objective::evaluate).
    type Error: ToString + 'static;

    /// Evaluate the objective function for a single trial.
    ///
    /// # Errors
    ///
    /// Any error whose type implements `ToString`. Pruning errors
    /// (`Error::TrialPruned` or `TrialPruned`) are handled specially —
    /// the trial is recorded as pruned rather than failed.
    fn evaluate(&self, trial: &mut Trial) -> Result<f64, Self::Error>;
}

impl<F, E> Objective for F
where
    F: Fn(&mut Trial) -> Result<f64, E>,
    E: ToString + 'static,
{
    type Error = E;

    fn evaluate(&self, trial: &mut Trial) -> Result<f64, E> {
        self(trial)
    }
}
