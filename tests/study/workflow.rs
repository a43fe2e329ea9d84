use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use terminator::prelude::*;

#[test]
fn optimize_records_every_terminal_state_in_order() {
    let study = Study::minimize();
    study
        .optimize(6, |trial: &mut Trial| match trial.id() % 3 {
            0 => Ok(trial.id() as f64),
            1 => Err(Error::TrialPruned),
            _ => Err(Error::Internal("evaluation failed")),
        })
        .unwrap();

    let trials = study.get_trials(None);
    assert_eq!(trials.len(), 6);
    let ids: Vec<u64> = trials.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);

    assert_eq!(study.get_trials(Some(&[TrialState::Complete])).len(), 2);
    assert_eq!(study.get_trials(Some(&[TrialState::Pruned])).len(), 2);
    assert_eq!(study.get_trials(Some(&[TrialState::Failed])).len(), 2);
    assert_eq!(study.n_trials(), 2);
}

#[test]
fn completed_values_are_present_and_others_absent() {
    let study = Study::minimize();
    study
        .optimize(4, |trial: &mut Trial| {
            if trial.id() % 2 == 0 {
                Ok(1.5)
            } else {
                Err("evaluation failed")
            }
        })
        .unwrap();

    for trial in study.get_trials(None) {
        match trial.state {
            TrialState::Complete => assert_eq!(trial.value, Some(1.5)),
            _ => assert!(trial.value.is_none()),
        }
    }
}

#[test]
fn stop_before_optimize_dispatches_no_trials() {
    let study = Study::minimize();
    study.stop();

    let result = study.optimize(10, |_trial: &mut Trial| Ok::<_, Error>(0.0));

    assert!(matches!(result, Err(Error::NoCompletedTrials)));
    assert!(study.get_trials(None).is_empty());
}

/// Stops the study once a fixed number of trials have completed.
struct StopAfter {
    n: usize,
}

impl StudyCallback for StopAfter {
    fn on_trial_finished(&self, study: &Study, _trial: &FinishedTrial) -> Result<()> {
        if study.n_trials() >= self.n {
            study.stop();
        }
        Ok(())
    }
}

#[test]
fn callback_can_stop_a_run_mid_budget() {
    let study = Study::minimize();
    study.add_callback(StopAfter { n: 4 });
    study
        .optimize(100, |_trial: &mut Trial| Ok::<_, Error>(0.0))
        .unwrap();

    assert_eq!(study.n_trials(), 4);
}

/// Counts how many times the loop notified it.
struct CountingCallback {
    seen: Arc<AtomicUsize>,
}

impl StudyCallback for CountingCallback {
    fn on_trial_finished(&self, _study: &Study, _trial: &FinishedTrial) -> Result<()> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn callbacks_fire_for_failed_and_pruned_trials_too() {
    let seen = Arc::new(AtomicUsize::new(0));
    let study = Study::minimize();
    study.add_callback(CountingCallback {
        seen: Arc::clone(&seen),
    });

    study
        .optimize(9, |trial: &mut Trial| match trial.id() % 3 {
            0 => Ok(0.0),
            1 => Err(Error::TrialPruned),
            _ => Err(Error::Internal("evaluation failed")),
        })
        .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 9);
}

#[test]
fn all_failures_is_an_error_but_history_survives() {
    let study = Study::minimize();
    let result = study.optimize(5, |_trial: &mut Trial| Err::<f64, _>("evaluation failed"));

    assert!(matches!(result, Err(Error::NoCompletedTrials)));
    assert_eq!(study.get_trials(Some(&[TrialState::Failed])).len(), 5);
}

#[test]
fn ask_tell_workflow_tracks_best_value() {
    let study = Study::maximize();

    let mut trial = study.ask();
    trial.set_param("x", 0.2);
    study.tell(trial, Ok::<_, Error>(1.0));

    let trial = study.ask();
    study.tell(trial, Err::<f64, _>("evaluation failed"));

    let mut trial = study.ask();
    trial.set_param("x", 0.8);
    study.tell(trial, Ok::<_, Error>(3.0));

    assert_eq!(study.n_trials(), 2);
    assert_eq!(study.best_value().unwrap(), 3.0);
    assert_eq!(study.best_trial().unwrap().params.get("x"), Some(&0.8));
}

#[test]
fn best_value_on_empty_study_is_an_error() {
    let study = Study::minimize();
    assert!(matches!(study.best_value(), Err(Error::NoCompletedTrials)));
}
