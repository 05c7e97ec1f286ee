//! Visualization session controller.
//!
//! Wires the pieces of one run together:
//! - `prepare`: stops any previous run, sets the tone range, emits `Reset`
//! - `run`: sorts on a blocking task while recording every step, joins it,
//!   then replays the history at the chosen cadence
//! - `stop`: cancels the engine and the replay, discards queued tones
//!
//! Presentation happens elsewhere: the controller only emits
//! [`VisualizerEvent`]s on an unbounded channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::replay::{ReplayOutcome, ReplayScheduler};
use crate::sort::{SortEngine, StepRecorder};
use crate::sound::TonePlayer;
use crate::types::{RunParameters, Step, StepHistory, StopHandle};

// ============================================================================
// VisualizerEvent
// ============================================================================

/// Events emitted towards the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualizerEvent {
    /// A run was prepared; paint the raw input.
    Reset {
        /// The unsorted input sequence
        values: Vec<i32>,
    },
    /// One replayed step.
    Step(Step),
    /// The last step has been shown.
    Complete,
}

// ============================================================================
// Visualizer
// ============================================================================

/// Controller for one visualization session.
pub struct Visualizer {
    tones: Arc<dyn TonePlayer>,
    scheduler: ReplayScheduler,
    event_tx: mpsc::UnboundedSender<VisualizerEvent>,
    parameters: Option<RunParameters>,
    stop: StopHandle,
    running: AtomicBool,
}

/// Clears the running flag when a run ends, however it ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Visualizer {
    /// Creates a controller emitting events on `event_tx`.
    pub fn new(
        tones: Arc<dyn TonePlayer>,
        event_tx: mpsc::UnboundedSender<VisualizerEvent>,
    ) -> Self {
        Self {
            scheduler: ReplayScheduler::new(Arc::clone(&tones)),
            tones,
            event_tx,
            parameters: None,
            stop: StopHandle::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Loads parameters for the next run.
    ///
    /// Any run in progress is stopped first. Sets the tone range from the
    /// input values and emits `Reset` with the raw sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver has been dropped.
    pub fn prepare(&mut self, parameters: RunParameters) -> Result<()> {
        self.stop();
        self.stop = StopHandle::new();

        let values = parameters.values();
        if let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) {
            self.tones.set_range(min, max);
        }

        self.event_tx
            .send(VisualizerEvent::Reset {
                values: parameters.values().to_vec(),
            })
            .context("Failed to send reset event")?;

        debug!(
            algorithm = %parameters.algorithm(),
            speed = %parameters.speed(),
            len = parameters.values().len(),
            "Run prepared"
        );
        self.parameters = Some(parameters);
        Ok(())
    }

    /// Returns the prepared parameters, if any.
    pub fn parameters(&self) -> Option<&RunParameters> {
        self.parameters.as_ref()
    }

    /// Returns a handle that stops the current run when triggered.
    ///
    /// The handle is replaced by [`prepare`](Self::prepare); take it after
    /// preparing.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Sorts the prepared input, then replays it.
    ///
    /// Returns `Cancelled` if a stop arrives during sorting or replay.
    ///
    /// # Errors
    ///
    /// Returns an error if a run is already in progress, no run was
    /// prepared, or the sort task failed.
    pub async fn run(&self) -> Result<ReplayOutcome> {
        if self.running.swap(true, Ordering::SeqCst) {
            bail!("A run is already in progress");
        }
        let _running = RunningGuard(&self.running);

        let parameters = self
            .parameters
            .clone()
            .context("No run prepared; call prepare() first")?;

        let Some(history) = self.record(&parameters).await? else {
            info!("Run stopped before sorting finished");
            return Ok(ReplayOutcome::Cancelled { steps_shown: 0 });
        };
        info!(
            algorithm = %parameters.algorithm(),
            steps = history.len(),
            "Sort recorded, starting replay"
        );

        let stop = self.stop.clone();
        let tx = self.event_tx.clone();
        let outcome = self
            .scheduler
            .play(
                &history,
                parameters.speed().delay(),
                |step| {
                    if tx.send(VisualizerEvent::Step(step.clone())).is_err() {
                        debug!("Event receiver dropped, stopping replay");
                        stop.stop();
                    }
                },
                || {
                    if tx.send(VisualizerEvent::Complete).is_err() {
                        debug!("Event receiver dropped, completion not delivered");
                    }
                },
                || stop.should_continue(),
            )
            .await;

        Ok(outcome)
    }

    /// Runs the engine off the async thread and joins it.
    ///
    /// Returns `None` if the run was stopped before the sort finished.
    async fn record(&self, parameters: &RunParameters) -> Result<Option<StepHistory>> {
        let values = parameters.values().to_vec();
        let engine = SortEngine::new(parameters.algorithm());
        let stop = self.stop.clone();

        let (status, history) = tokio::task::spawn_blocking(move || {
            let mut recorder = StepRecorder::new();
            engine
                .run_until(&values, &mut recorder, &stop)
                .map(|status| (status, recorder.into_history()))
        })
        .await
        .context("Sort task failed")?
        .context("Sort run rejected its input")?;

        Ok(status.is_finished().then_some(history))
    }

    /// Returns true while [`run`](Self::run) is sorting or replaying.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops the current run and discards queued tones.
    pub fn stop(&self) {
        self.stop.stop();
        self.tones.reset();
    }

    /// Mutes or unmutes tone feedback.
    pub fn set_muted(&self, muted: bool) {
        self.tones.set_muted(muted);
    }

    /// Returns true if tone feedback is muted.
    pub fn is_muted(&self) -> bool {
        self.tones.is_muted()
    }

    /// Flips the mute state and returns the new value.
    pub fn toggle_mute(&self) -> bool {
        let muted = !self.is_muted();
        self.set_muted(muted);
        muted
    }
}

impl std::fmt::Debug for Visualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visualizer")
            .field("parameters", &self.parameters)
            .field("stopped", &self.stop.is_stopped())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::MockTonePlayer;
    use crate::types::{AlgorithmKind, FrequencyMap, SimulationSpeed};

    fn create_visualizer() -> (
        Visualizer,
        Arc<MockTonePlayer>,
        mpsc::UnboundedReceiver<VisualizerEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tones = Arc::new(MockTonePlayer::new());
        (Visualizer::new(tones.clone(), tx), tones, rx)
    }

    fn params(values: &[i32], algorithm: AlgorithmKind) -> RunParameters {
        RunParameters::new(values.to_vec(), algorithm, SimulationSpeed::Fast).unwrap()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<VisualizerEvent>) -> Vec<VisualizerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_run_without_prepare_fails() {
        let (visualizer, _tones, _rx) = create_visualizer();
        assert!(visualizer.run().await.is_err());
    }

    #[tokio::test]
    async fn test_prepare_sets_range_and_emits_reset() {
        let (mut visualizer, tones, mut rx) = create_visualizer();
        visualizer
            .prepare(params(&[10, 10], AlgorithmKind::QuickSort))
            .unwrap();

        assert_eq!(tones.range(), Some(FrequencyMap::new(10, 11)));
        assert_eq!(
            drain(&mut rx),
            vec![VisualizerEvent::Reset { values: vec![10, 10] }]
        );
        // prepare stops a (possibly absent) previous run
        assert_eq!(tones.reset_count(), 1);
    }

    #[tokio::test]
    async fn test_stop_before_run_cancels() {
        let (mut visualizer, _tones, mut rx) = create_visualizer();
        visualizer
            .prepare(params(&[3, 2, 1], AlgorithmKind::MergeSort))
            .unwrap();
        visualizer.stop();

        let outcome = visualizer.run().await.unwrap();
        assert_eq!(outcome, ReplayOutcome::Cancelled { steps_shown: 0 });
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], VisualizerEvent::Reset { .. }));
    }

    #[tokio::test]
    async fn test_prepare_clears_previous_stop() {
        let (mut visualizer, _tones, _rx) = create_visualizer();
        visualizer
            .prepare(params(&[2, 1], AlgorithmKind::QuickSort))
            .unwrap();
        let old = visualizer.stop_handle();
        visualizer
            .prepare(params(&[2, 1], AlgorithmKind::QuickSort))
            .unwrap();
        assert!(old.is_stopped());
        assert!(visualizer.stop_handle().should_continue());
    }

    #[tokio::test]
    async fn test_overlapping_run_is_rejected() {
        let (mut visualizer, _tones, mut rx) = create_visualizer();
        visualizer
            .prepare(params(&[2, 1], AlgorithmKind::QuickSort))
            .unwrap();

        let (first, second) = tokio::join!(visualizer.run(), visualizer.run());
        assert_eq!(first.unwrap(), ReplayOutcome::Completed { steps: 4 });
        assert!(second.is_err());
        assert!(!visualizer.is_running());

        let events = drain(&mut rx);
        let steps = events
            .iter()
            .filter(|e| matches!(e, VisualizerEvent::Step(_)))
            .count();
        let completes = events
            .iter()
            .filter(|e| **e == VisualizerEvent::Complete)
            .count();
        assert_eq!((steps, completes), (4, 1));
    }

    #[tokio::test]
    async fn test_dropped_receiver_ends_run_quietly() {
        let (mut visualizer, _tones, rx) = create_visualizer();
        visualizer
            .prepare(params(&[3, 2, 1], AlgorithmKind::MergeSort))
            .unwrap();
        drop(rx);

        // the first failed send stops the replay before the next step
        let outcome = visualizer.run().await.unwrap();
        assert_eq!(outcome, ReplayOutcome::Cancelled { steps_shown: 1 });
        assert!(visualizer.stop_handle().is_stopped());
    }

    #[tokio::test]
    async fn test_running_flag_clears_after_failed_run() {
        let (visualizer, _tones, _rx) = create_visualizer();
        assert!(visualizer.run().await.is_err());
        assert!(!visualizer.is_running());
    }

    #[test]
    fn test_toggle_mute() {
        let (visualizer, tones, _rx) = create_visualizer();
        assert!(visualizer.toggle_mute());
        assert!(tones.is_muted());
        assert!(!visualizer.toggle_mute());
        assert!(!visualizer.is_muted());
    }
}
