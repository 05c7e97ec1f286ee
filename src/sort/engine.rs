//! Instrumented sort driver.
//!
//! The engine sorts a private copy of its input and hands the observer a
//! self-contained [`Step`] after every state-changing operation. Steps are
//! emitted in the order the operations happen; the array in each step is the
//! post-operation state.

use tracing::debug;

use super::error::SortError;
use super::{mergesort, quicksort, SortObserver};
use crate::types::{AlgorithmKind, Step, StopHandle};

/// Result of a run that started successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// The sort ran to completion.
    Finished {
        /// Number of notifications emitted, initial and final included
        notifications: usize,
        /// `permutation[i]` is the input index of the value that ended at `i`
        permutation: Vec<usize>,
    },
    /// A stop was requested before the sort finished.
    Interrupted {
        /// Number of notifications emitted before the stop was seen
        notifications: usize,
    },
}

impl RunStatus {
    /// Returns true if the run reached its final notification.
    pub fn is_finished(&self) -> bool {
        matches!(self, RunStatus::Finished { .. })
    }

    /// Number of notifications the observer received.
    pub fn notifications(&self) -> usize {
        match self {
            RunStatus::Finished { notifications, .. } | RunStatus::Interrupted { notifications } => {
                *notifications
            }
        }
    }

    /// Final input-index permutation, if the run finished.
    pub fn permutation(&self) -> Option<&[usize]> {
        match self {
            RunStatus::Finished { permutation, .. } => Some(permutation),
            RunStatus::Interrupted { .. } => None,
        }
    }
}

/// Marker returned through the recursion once a stop is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Interrupted;

/// State of one run: the working array plus the notification sink.
///
/// `origins` moves in lockstep with `array` and records where each value
/// started.
pub(crate) struct Run<'a> {
    array: Vec<i32>,
    origins: Vec<usize>,
    observer: &'a mut dyn SortObserver,
    stop: Option<&'a StopHandle>,
    notifications: usize,
}

impl<'a> Run<'a> {
    fn new(
        array: Vec<i32>,
        observer: &'a mut dyn SortObserver,
        stop: Option<&'a StopHandle>,
    ) -> Self {
        Self {
            origins: (0..array.len()).collect(),
            array,
            observer,
            stop,
            notifications: 0,
        }
    }

    pub(crate) fn array(&self) -> &[i32] {
        &self.array
    }

    /// Value and origin at `index`.
    pub(crate) fn slot(&self, index: usize) -> (i32, usize) {
        (self.array[index], self.origins[index])
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.array.swap(a, b);
        self.origins.swap(a, b);
    }

    pub(crate) fn write(&mut self, index: usize, (value, origin): (i32, usize)) {
        self.array[index] = value;
        self.origins[index] = origin;
    }

    /// Publishes the current array with the given highlights.
    pub(crate) fn notify(&mut self, highlighted: &[usize]) -> Result<(), Interrupted> {
        self.emit(highlighted, false)
    }

    fn emit(&mut self, highlighted: &[usize], complete: bool) -> Result<(), Interrupted> {
        if self.stop.is_some_and(StopHandle::is_stopped) {
            return Err(Interrupted);
        }
        self.observer
            .on_step(Step::new(self.array.clone(), highlighted.to_vec(), complete));
        self.notifications += 1;
        Ok(())
    }
}

/// Runs one sort variant with step notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortEngine {
    algorithm: AlgorithmKind,
}

impl SortEngine {
    /// Creates an engine for the given algorithm.
    pub fn new(algorithm: AlgorithmKind) -> Self {
        Self { algorithm }
    }

    /// Returns the configured algorithm.
    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    /// Sorts a copy of `values`, notifying `observer` at every step.
    ///
    /// # Errors
    ///
    /// Returns `SortError::EmptySequence` if `values` is empty.
    pub fn run(
        &self,
        values: &[i32],
        observer: &mut dyn SortObserver,
    ) -> Result<RunStatus, SortError> {
        self.execute(values, observer, None)
    }

    /// Like [`run`](Self::run), but abandons the sort at the next
    /// notification once `stop` is set.
    ///
    /// # Errors
    ///
    /// Returns `SortError::EmptySequence` if `values` is empty.
    pub fn run_until(
        &self,
        values: &[i32],
        observer: &mut dyn SortObserver,
        stop: &StopHandle,
    ) -> Result<RunStatus, SortError> {
        self.execute(values, observer, Some(stop))
    }

    fn execute(
        &self,
        values: &[i32],
        observer: &mut dyn SortObserver,
        stop: Option<&StopHandle>,
    ) -> Result<RunStatus, SortError> {
        if values.is_empty() {
            return Err(SortError::EmptySequence);
        }

        debug!(algorithm = %self.algorithm, len = values.len(), "Starting sort run");

        let mut run = Run::new(values.to_vec(), observer, stop);
        let high = values.len() - 1;
        let algorithm = self.algorithm;

        let result = run
            .emit(&[], false)
            .and_then(|()| match algorithm {
                AlgorithmKind::QuickSort => quicksort::sort(&mut run, 0, high),
                AlgorithmKind::MergeSort => mergesort::sort(&mut run, 0, high),
            })
            .and_then(|()| run.emit(&[], true));

        let notifications = run.notifications;
        match result {
            Ok(()) => {
                debug!(notifications, "Sort run finished");
                Ok(RunStatus::Finished {
                    notifications,
                    permutation: run.origins,
                })
            }
            Err(Interrupted) => {
                debug!(notifications, "Sort run interrupted");
                Ok(RunStatus::Interrupted { notifications })
            }
        }
    }
}
