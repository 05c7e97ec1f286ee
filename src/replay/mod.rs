//! Paced replay of a recorded step history.
//!
//! The scheduler walks a finished [`StepHistory`] in order. For each step it
//! checks for cancellation, requests a tone for every highlighted value,
//! hands the step to the presentation callback and then sleeps for the
//! cadence delay. Tone requests are fire-and-forget, so a slow audio device
//! never stretches the cadence.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::sound::TonePlayer;
use crate::types::{Step, StepHistory};

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every step was shown and the completion callback ran.
    Completed {
        /// Number of steps shown
        steps: usize,
    },
    /// A stop was observed at a step boundary.
    Cancelled {
        /// Number of steps shown before the stop
        steps_shown: usize,
    },
}

impl ReplayOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ReplayOutcome::Completed { .. })
    }

    /// Number of steps handed to the presentation callback.
    pub fn steps_shown(&self) -> usize {
        match self {
            ReplayOutcome::Completed { steps } => *steps,
            ReplayOutcome::Cancelled { steps_shown } => *steps_shown,
        }
    }
}

/// Drives paced playback of a step history with tone feedback.
#[derive(Clone)]
pub struct ReplayScheduler {
    tones: Arc<dyn TonePlayer>,
}

impl ReplayScheduler {
    /// Creates a scheduler that requests tones from `tones`.
    pub fn new(tones: Arc<dyn TonePlayer>) -> Self {
        Self { tones }
    }

    /// Plays `history` with `delay` between steps.
    ///
    /// `should_continue` is checked once before each step; when it returns
    /// false the replay stops without showing further steps and without
    /// calling `on_complete`. Otherwise `on_complete` runs exactly once after
    /// the last step.
    pub async fn play<S, C, K>(
        &self,
        history: &StepHistory,
        delay: Duration,
        mut on_step: S,
        on_complete: C,
        should_continue: K,
    ) -> ReplayOutcome
    where
        S: FnMut(&Step),
        C: FnOnce(),
        K: Fn() -> bool,
    {
        debug!(steps = history.len(), delay_ms = delay.as_millis() as u64, "Replay started");

        for (shown, step) in history.iter().enumerate() {
            if !should_continue() {
                info!(steps_shown = shown, "Replay cancelled");
                return ReplayOutcome::Cancelled { steps_shown: shown };
            }

            self.request_tones(step);
            on_step(step);
            tokio::time::sleep(delay).await;
        }

        on_complete();
        debug!("Replay completed");
        ReplayOutcome::Completed {
            steps: history.len(),
        }
    }

    fn request_tones(&self, step: &Step) {
        let mut requested = 0;
        for value in step.highlighted_values() {
            self.tones.play_tone(value);
            requested += 1;
        }

        let skipped = step.highlighted().len() - requested;
        if skipped > 0 {
            warn!(
                skipped,
                highlighted = ?step.highlighted(),
                len = step.array().len(),
                "Highlight out of range, no tone"
            );
        }
    }
}

impl std::fmt::Debug for ReplayScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayScheduler")
            .field("muted", &self.tones.is_muted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Instant;

    use super::*;
    use crate::sort::record;
    use crate::sound::MockTonePlayer;
    use crate::types::AlgorithmKind;

    fn create_scheduler() -> (ReplayScheduler, Arc<MockTonePlayer>) {
        let tones = Arc::new(MockTonePlayer::new());
        (ReplayScheduler::new(tones.clone()), tones)
    }

    #[tokio::test]
    async fn test_replays_all_steps_in_order() {
        let (scheduler, _tones) = create_scheduler();
        let history = record(AlgorithmKind::QuickSort, &[5, 3, 8, 1]).unwrap();

        let mut seen = Vec::new();
        let completed = Cell::new(0);
        let outcome = scheduler
            .play(
                &history,
                Duration::ZERO,
                |step| seen.push(step.clone()),
                || completed.set(completed.get() + 1),
                || true,
            )
            .await;

        assert_eq!(outcome, ReplayOutcome::Completed { steps: history.len() });
        assert_eq!(seen, history.steps());
        assert_eq!(completed.get(), 1);
    }

    #[tokio::test]
    async fn test_tones_follow_highlights() {
        let (scheduler, tones) = create_scheduler();
        let history = record(AlgorithmKind::QuickSort, &[2, 1]).unwrap();

        scheduler
            .play(&history, Duration::ZERO, |_| {}, || {}, || true)
            .await;

        // compare {0,1} on [2,1], then pivot rest {0} on [1,2]
        assert_eq!(tones.played(), vec![2, 1, 1]);
    }

    #[tokio::test]
    async fn test_out_of_range_highlight_is_skipped() {
        let (scheduler, tones) = create_scheduler();
        let history: StepHistory =
            serde_json::from_str(r#"[{"array":[4,5],"highlighted":[1,7],"complete":true}]"#)
                .unwrap();

        let outcome = scheduler
            .play(&history, Duration::ZERO, |_| {}, || {}, || true)
            .await;

        assert!(outcome.is_completed());
        assert_eq!(tones.played(), vec![5]);
    }

    #[tokio::test]
    async fn test_cancel_stops_steps_and_completion() {
        let (scheduler, tones) = create_scheduler();
        let history = record(AlgorithmKind::MergeSort, &[4, 3, 2, 1]).unwrap();

        let shown = Cell::new(0usize);
        let completed = Cell::new(false);
        let outcome = scheduler
            .play(
                &history,
                Duration::ZERO,
                |_| shown.set(shown.get() + 1),
                || completed.set(true),
                || shown.get() < 3,
            )
            .await;

        assert_eq!(outcome, ReplayOutcome::Cancelled { steps_shown: 3 });
        assert_eq!(shown.get(), 3);
        assert!(!completed.get());
        // initial step has no highlights, then compare {0,1} and write {0}
        assert_eq!(tones.play_count(), 3);
    }

    #[tokio::test]
    async fn test_cancel_before_first_step() {
        let (scheduler, _tones) = create_scheduler();
        let history = record(AlgorithmKind::QuickSort, &[1, 2]).unwrap();
        let outcome = scheduler
            .play(&history, Duration::ZERO, |_| panic!("no steps"), || panic!("no completion"), || false)
            .await;
        assert_eq!(outcome.steps_shown(), 0);
    }

    #[tokio::test]
    async fn test_cadence_is_honored() {
        let (scheduler, _tones) = create_scheduler();
        let history = record(AlgorithmKind::QuickSort, &[7]).unwrap();
        let started = Instant::now();
        scheduler
            .play(&history, Duration::from_millis(20), |_| {}, || {}, || true)
            .await;
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_muted_player_still_shows_steps() {
        let (scheduler, tones) = create_scheduler();
        tones.set_muted(true);
        let history = record(AlgorithmKind::MergeSort, &[3, 1, 2]).unwrap();
        let mut count = 0;
        let outcome = scheduler
            .play(&history, Duration::ZERO, |_| count += 1, || {}, || true)
            .await;
        assert!(outcome.is_completed());
        assert_eq!(count, history.len());
        assert_eq!(tones.play_count(), 0);
    }
}
