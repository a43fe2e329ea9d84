//! Trial handles and their terminal records.

use std::collections::HashMap;

use crate::types::TrialState;

/// A trial represents a single evaluation of the objective function.
///
/// Each trial has a unique, monotonically increasing ID assigned by the
/// study. The objective function records the parameter assignment it
/// evaluated via [`set_param`](Trial::set_param); those values are opaque
/// to the termination engine except as surrogate-model features.
///
/// A trial is in the `Running` state for its whole lifetime as a `Trial`
/// value; recording its result with [`Study::tell`](crate::Study::tell)
/// (or the loop doing so internally) converts it into a [`FinishedTrial`].
#[derive(Clone, Debug)]
pub struct Trial {
    /// Unique identifier for this trial.
    id: u64,
    /// The parameter assignment under evaluation, keyed by name.
    params: HashMap<String, f64>,
}

impl Trial {
    /// Creates a new running trial with the given ID.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            params: HashMap::new(),
        }
    }

    /// Returns the unique ID of this trial.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Records a parameter value evaluated by this trial.
    ///
    /// # Examples
    ///
    /// ```
    /// use terminator::Trial;
    ///
    /// let mut trial = Trial::new(0);
    /// trial.set_param("learning_rate", 0.01);
    /// assert_eq!(trial.param("learning_rate"), Some(0.01));
    /// ```
    pub fn set_param(&mut self, name: impl Into<String>, value: f64) {
        self.params.insert(name.into(), value);
    }

    /// Returns the recorded value for the given parameter, if any.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }

    /// Returns a reference to the recorded parameter assignment.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, f64> {
        &self.params
    }

    /// Consumes the trial, producing its immutable terminal record.
    ///
    /// `value` must be `Some` exactly when `state` is
    /// [`Complete`](TrialState::Complete).
    pub(crate) fn into_finished(self, value: Option<f64>, state: TrialState) -> FinishedTrial {
        FinishedTrial {
            id: self.id,
            state,
            value,
            params: self.params,
        }
    }
}

/// The immutable record of a trial that reached a terminal state.
///
/// Stored by the study in creation order. The objective `value` is defined
/// only for [`Complete`](TrialState::Complete) trials.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinishedTrial {
    /// The unique identifier for this trial.
    pub id: u64,
    /// The terminal state of the trial.
    pub state: TrialState,
    /// The objective value (`Some` iff the trial completed).
    pub value: Option<f64>,
    /// The parameter assignment that was evaluated, keyed by name.
    pub params: HashMap<String, f64>,
}

impl FinishedTrial {
    /// Creates a terminal trial record.
    #[must_use]
    pub fn new(id: u64, state: TrialState, value: Option<f64>, params: HashMap<String, f64>) -> Self {
        Self {
            id,
            state,
            value,
            params,
        }
    }

    /// Creates a completed trial record with the given objective value.
    #[must_use]
    pub fn completed(id: u64, params: HashMap<String, f64>, value: f64) -> Self {
        Self::new(id, TrialState::Complete, Some(value), params)
    }
}
