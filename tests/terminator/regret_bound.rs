use terminator::prelude::*;

/// Record a completed trial with one parameter and an objective value.
fn record(study: &Study, x: f64, value: f64) {
    let mut trial = study.ask();
    trial.set_param("x", x);
    study.complete_trial(trial, value);
}

fn seeded_strategy(noise_floor: f64) -> RegretBoundTerminator {
    RegretBoundTerminator::with_evaluators(
        RegretBoundEvaluator::with_seed(42),
        StaticErrorEvaluator::new(noise_floor),
    )
}

#[test]
fn empty_history_returns_false() {
    let strategy = RegretBoundTerminator::new();
    let study = Study::minimize();
    assert!(!strategy.should_terminate(&study).unwrap());
}

#[test]
fn single_completed_trial_returns_false() {
    let strategy = RegretBoundTerminator::new();
    let study = Study::minimize();
    record(&study, 0.5, 1.0);
    assert!(!strategy.should_terminate(&study).unwrap());
}

// A huge noise floor swallows any remaining improvement.
#[test]
fn verdict_true_when_noise_floor_dominates() {
    let strategy = seeded_strategy(1e12);
    let study = Study::minimize();
    record(&study, 0.0, 3.0);
    record(&study, 0.5, 1.0);
    record(&study, 1.0, 2.0);
    assert!(strategy.should_terminate(&study).unwrap());
}

// With a zero noise floor and spread-out observations, the confidence bound
// always leaves room for improvement.
#[test]
fn verdict_false_when_no_noise_is_tolerated() {
    let strategy = seeded_strategy(0.0);
    let study = Study::minimize();
    record(&study, 0.0, 0.0);
    record(&study, 0.4, 1.0);
    record(&study, 0.9, 4.0);
    assert!(!strategy.should_terminate(&study).unwrap());
}

// Repeated invocation on a growing history is safe; the verdict tracks
// whatever history is visible at call time.
#[test]
fn repeated_calls_on_growing_history_are_safe() {
    let strategy = seeded_strategy(0.0);
    let study = Study::minimize();

    assert!(!strategy.should_terminate(&study).unwrap());

    record(&study, 0.0, 0.0);
    record(&study, 0.5, 1.0);
    assert!(!strategy.should_terminate(&study).unwrap());
    assert!(!strategy.should_terminate(&study).unwrap());

    record(&study, 1.0, 4.0);
    assert!(!strategy.should_terminate(&study).unwrap());
}

// The default strategy (GP regret bound vs. leave-one-out CV error) must
// produce a verdict, not an error, on a well-formed history.
#[test]
fn default_strategy_evaluates_without_error() {
    let strategy = RegretBoundTerminator::new();
    let study = Study::maximize();
    record(&study, 0.1, 1.0);
    record(&study, 0.5, 3.0);
    record(&study, 0.8, 2.0);
    record(&study, 0.3, 2.5);
    let verdict = strategy.should_terminate(&study);
    assert!(verdict.is_ok());
}

// Trials without recorded parameters still yield a verdict: the surrogate
// degenerates to a zero-dimensional model instead of erroring.
#[test]
fn parameterless_trials_still_yield_a_verdict() {
    let strategy = seeded_strategy(1e12);
    let study = Study::minimize();
    for value in [1.0, 2.0, 3.0] {
        let trial = study.ask();
        study.complete_trial(trial, value);
    }
    assert!(strategy.should_terminate(&study).unwrap());
}
