use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use terminator::prelude::*;

/// A strategy with a fixed verdict, regardless of history.
struct StaticTerminator {
    verdict: bool,
}

impl Terminator for StaticTerminator {
    fn should_terminate(&self, _study: &Study) -> Result<bool> {
        Ok(self.verdict)
    }
}

/// A strategy that fires once the latest completed trial reaches a given
/// ordinal.
struct DeterministicTerminator {
    termination_trial_number: u64,
}

impl Terminator for DeterministicTerminator {
    fn should_terminate(&self, study: &Study) -> Result<bool> {
        let trials = study.get_trials(Some(&[TrialState::Complete]));
        let latest = trials.iter().map(|t| t.id).max();
        Ok(latest.is_some_and(|n| n >= self.termination_trial_number))
    }
}

fn constant_objective(_trial: &mut Trial) -> Result<f64> {
    Ok(0.0)
}

// The study stops at the trial where `should_terminate` first returns true:
// trial #10 completes, the verdict flips, and no further trial is dispatched.
#[test]
fn study_stops_at_first_true_verdict() {
    let callback = TerminatorCallback::new(
        DeterministicTerminator {
            termination_trial_number: 10,
        },
        10,
    )
    .unwrap();

    let study = Study::minimize();
    study.add_callback(callback);
    study.optimize(100, constant_objective).unwrap();

    // Trials are numbered 0..=10: the verdict flips when trial #10 completes.
    assert_eq!(study.get_trials(None).len(), 11);
}

// The gate dominates the strategy: even an always-true terminator cannot
// stop the study before `min_n_trials` trials have completed.
#[test]
fn gate_dominates_always_true_strategy() {
    let min_n_trials = 3;

    let callback =
        TerminatorCallback::new(StaticTerminator { verdict: true }, min_n_trials).unwrap();

    let study = Study::minimize();
    study.add_callback(callback);
    study.optimize(100, constant_objective).unwrap();

    assert_eq!(study.get_trials(None).len(), min_n_trials);
}

#[test]
fn always_false_strategy_runs_the_full_budget() {
    let callback = TerminatorCallback::new(StaticTerminator { verdict: false }, 1).unwrap();

    let study = Study::minimize();
    study.add_callback(callback);
    study.optimize(50, constant_objective).unwrap();

    assert_eq!(study.get_trials(None).len(), 50);
}

#[test]
fn zero_gate_is_a_configuration_error() {
    let result = TerminatorCallback::new(StaticTerminator { verdict: true }, 0);
    assert!(matches!(result, Err(Error::InvalidMinTrials { got: 0 })));
}

// Only successfully completed trials open the gate.
#[test]
fn failed_trials_do_not_open_the_gate() {
    let callback = TerminatorCallback::new(StaticTerminator { verdict: true }, 3).unwrap();

    let study = Study::minimize();
    study.add_callback(callback);
    study
        .optimize(100, |trial: &mut Trial| {
            if trial.id() < 5 {
                Err("evaluation failed")
            } else {
                Ok(0.0)
            }
        })
        .unwrap();

    // Five failures, then three completions before the stop lands.
    assert_eq!(study.n_trials(), 3);
    assert_eq!(study.get_trials(None).len(), 8);
}

#[test]
fn pruned_trials_do_not_open_the_gate() {
    let callback = TerminatorCallback::new(StaticTerminator { verdict: true }, 2).unwrap();

    let study = Study::minimize();
    study.add_callback(callback);
    study
        .optimize(100, |trial: &mut Trial| {
            if trial.id() < 2 {
                Err(Error::TrialPruned)
            } else {
                Ok(0.0)
            }
        })
        .unwrap();

    assert_eq!(study.get_trials(Some(&[TrialState::Pruned])).len(), 2);
    assert_eq!(study.n_trials(), 2);
    assert_eq!(study.get_trials(None).len(), 4);
}

/// A strategy that always fails, for the error-propagation contract.
struct FailingTerminator;

impl Terminator for FailingTerminator {
    fn should_terminate(&self, _study: &Study) -> Result<bool> {
        Err(Error::SurrogateFit("cholesky factorization failed"))
    }
}

// Strategy evaluation errors are not suppressed: they abort the run, and
// the history recorded up to that point remains queryable.
#[test]
fn terminator_error_aborts_the_run() {
    let callback = TerminatorCallback::new(FailingTerminator, 1).unwrap();

    let study = Study::minimize();
    study.add_callback(callback);
    let result = study.optimize(10, constant_objective);

    assert!(matches!(result, Err(Error::SurrogateFit(_))));
    assert_eq!(study.get_trials(None).len(), 1);
}

/// Records every consultation so tests can assert the gate held.
struct CountingTerminator {
    calls: Arc<AtomicUsize>,
}

impl Terminator for CountingTerminator {
    fn should_terminate(&self, _study: &Study) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(false)
    }
}

#[test]
fn strategy_not_consulted_while_gate_is_closed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let callback = TerminatorCallback::new(
        CountingTerminator {
            calls: Arc::clone(&calls),
        },
        5,
    )
    .unwrap();

    let study = Study::minimize();
    study.add_callback(callback);
    study.optimize(3, constant_objective).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// Concurrent trial completions may each trigger the callback; the stop
// request is idempotent and nothing panics.
#[test]
fn concurrent_callback_invocations_are_safe() {
    let study = Study::minimize();
    for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
        let trial = study.ask();
        study.complete_trial(trial, value);
    }
    let record = study.get_trials(None).pop().unwrap();

    let callback =
        Arc::new(TerminatorCallback::new(StaticTerminator { verdict: true }, 1).unwrap());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let callback = Arc::clone(&callback);
            let study = &study;
            let record = &record;
            scope.spawn(move || {
                callback.on_trial_finished(study, record).unwrap();
            });
        }
    });

    assert!(study.is_stopped());
}
