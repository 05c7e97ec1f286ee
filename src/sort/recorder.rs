//! Observer that collects engine notifications.

use super::SortObserver;
use crate::types::{Step, StepHistory};

/// Accumulates every notification into an ordered [`StepHistory`].
///
/// The recorder is owned by the thread running the engine. Once the run
/// returns, [`into_history`](Self::into_history) hands the finished history
/// to whoever joins that thread.
#[derive(Debug, Default)]
pub struct StepRecorder {
    history: StepHistory,
}

impl StepRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps recorded so far.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Returns the history recorded so far.
    pub fn history(&self) -> &StepHistory {
        &self.history
    }

    /// Consumes the recorder, returning the history.
    pub fn into_history(self) -> StepHistory {
        self.history
    }
}

impl SortObserver for StepRecorder {
    fn on_step(&mut self, step: Step) {
        self.history.push(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortEngine;
    use crate::types::AlgorithmKind;

    #[test]
    fn test_recorder_appends_in_order() {
        let mut recorder = StepRecorder::new();
        recorder.on_step(Step::new(vec![2, 1], vec![], false));
        recorder.on_step(Step::new(vec![1, 2], vec![0], false));
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.history().get(1).unwrap().highlighted(), &[0]);
    }

    #[test]
    fn test_recorded_steps_are_independent_copies() {
        let mut recorder = StepRecorder::new();
        SortEngine::new(AlgorithmKind::QuickSort)
            .run(&[3, 2, 1], &mut recorder)
            .unwrap();
        let history = recorder.into_history();
        assert_eq!(history.first().unwrap().array(), &[3, 2, 1]);
        assert_eq!(history.last().unwrap().array(), &[1, 2, 3]);
    }
}
