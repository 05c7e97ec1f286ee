//! Instrumented sorting engine.
//!
//! This module runs a sort variant over a private copy of the input and
//! reports progress through an observer:
//!
//! - `engine`: the shared driver, notification protocol and cancellation
//! - `quicksort`: Lomuto partition quicksort
//! - `mergesort`: stable top-down mergesort
//! - `recorder`: the observer that builds a [`StepHistory`]
//!
//! # Usage
//!
//! ```
//! use sortviz::sort::{SortEngine, StepRecorder};
//! use sortviz::types::AlgorithmKind;
//!
//! let mut recorder = StepRecorder::new();
//! SortEngine::new(AlgorithmKind::QuickSort)
//!     .run(&[5, 3, 8, 1], &mut recorder)
//!     .unwrap();
//!
//! let history = recorder.into_history();
//! assert_eq!(history.last().unwrap().array(), &[1, 3, 5, 8]);
//! ```

mod engine;
mod error;
mod mergesort;
mod quicksort;
mod recorder;

pub use engine::{RunStatus, SortEngine};
pub use error::SortError;
pub use recorder::StepRecorder;

use crate::types::{AlgorithmKind, Step, StepHistory};

/// Receives one snapshot per engine notification.
pub trait SortObserver {
    /// Called synchronously, in operation order, after each state change.
    fn on_step(&mut self, step: Step);
}

impl<F> SortObserver for F
where
    F: FnMut(Step),
{
    fn on_step(&mut self, step: Step) {
        self(step)
    }
}

/// Runs `algorithm` over `values` and returns the complete history.
///
/// # Errors
///
/// Returns `SortError::EmptySequence` if `values` is empty.
pub fn record(algorithm: AlgorithmKind, values: &[i32]) -> Result<StepHistory, SortError> {
    let mut recorder = StepRecorder::new();
    SortEngine::new(algorithm).run(values, &mut recorder)?;
    Ok(recorder.into_history())
}
