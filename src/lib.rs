#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Early-stopping engine for black-box optimization loops.
//!
//! After each evaluated trial, a [`Terminator`](terminator::Terminator)
//! strategy inspects the accumulated history and decides whether further
//! search is still worth its cost. The reference strategy bounds the
//! *regret* — the gap between the best value found so far and the true
//! optimum — and stops once that gap can no longer be distinguished from
//! the statistical noise of the search itself.
//!
//! # Getting Started
//!
//! Attach a [`TerminatorCallback`](terminator::TerminatorCallback) to a
//! study and optimize until the regret bound says further trials are noise:
//!
//! ```
//! use terminator::prelude::*;
//!
//! let study = Study::minimize();
//! let cb = TerminatorCallback::new(RegretBoundTerminator::new(), 20)?;
//! study.add_callback(cb);
//!
//! study.optimize(60, |trial: &mut Trial| {
//!     let x = trial.id() as f64 / 60.0;
//!     trial.set_param("x", x);
//!     Ok::<_, Error>((x - 0.3).powi(2))
//! })?;
//!
//! assert!(study.n_trials() >= 20);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Study`] | Ordered, append-only trial history plus the optimization loop and stop flag. |
//! | [`Trial`] / [`FinishedTrial`] | A single evaluation in flight / its immutable terminal record. |
//! | [`Terminator`](terminator::Terminator) | Strategy answering "should the search stop now?" from trial history. |
//! | [`TerminatorCallback`](terminator::TerminatorCallback) | Adapter wiring a terminator into the per-trial lifecycle, gated by a minimum trial count. |
//! | [`ImprovementEvaluator`](terminator::ImprovementEvaluator) | Estimates the improvement still obtainable from further search. |
//! | [`ErrorEvaluator`](terminator::ErrorEvaluator) | Estimates the noise floor of the current best estimate. |
//!
//! # Termination Strategies
//!
//! | Strategy | Verdict | Best for |
//! |----------|---------|----------|
//! | [`RegretBoundTerminator`](terminator::RegretBoundTerminator) | Remaining improvement ≤ cross-validation error | Statistically grounded stopping |
//! | [`StagnationTerminator`](terminator::StagnationTerminator) | No new best for `patience` trials | Cheap, model-free stopping |
//!
//! Custom strategies implement [`Terminator`](terminator::Terminator) —
//! one required method, same contract.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on public data types | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at trial completion and termination verdicts | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod error;
mod objective;
mod study;
pub mod terminator;
mod trial;
mod types;

pub use error::{Error, Result, TrialPruned};
pub use objective::Objective;
pub use study::{Study, StudyCallback};
pub use trial::{FinishedTrial, Trial};
pub use types::{Direction, TrialState};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use terminator::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result, TrialPruned};
    pub use crate::objective::Objective;
    pub use crate::study::{Study, StudyCallback};
    pub use crate::terminator::{
        CrossValidationErrorEvaluator, ErrorEvaluator, ImprovementEvaluator,
        RegretBoundEvaluator, RegretBoundTerminator, StagnationTerminator, StaticErrorEvaluator,
        Terminator, TerminatorCallback,
    };
    pub use crate::trial::{FinishedTrial, Trial};
    pub use crate::types::{Direction, TrialState};
}
