//! Audio output backends for tone bursts.
//!
//! A [`ToneSink`] lives on the audio worker thread and plays one burst at a
//! time, returning once the burst has drained. Sinks are created by a
//! [`SinkFactory`] on that thread, because rodio output streams are not
//! `Send`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use super::error::SoundError;
use super::synth::ToneBurst;

/// Plays synthesized bursts on an output device.
pub trait ToneSink {
    /// Plays `burst` and blocks until it has finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the burst could not be played.
    fn play(&mut self, burst: &ToneBurst) -> Result<(), SoundError>;
}

/// Opens a sink on the calling thread.
pub type SinkFactory = Arc<dyn Fn() -> Result<Box<dyn ToneSink>, SoundError> + Send + Sync>;

// ============================================================================
// RodioToneSink
// ============================================================================

/// A tone sink on the default rodio output device.
pub struct RodioToneSink {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioToneSink {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// A factory producing rodio sinks on the default device.
    #[must_use]
    pub fn factory() -> SinkFactory {
        Arc::new(|| Self::new().map(|sink| Box::new(sink) as Box<dyn ToneSink>))
    }
}

impl ToneSink for RodioToneSink {
    fn play(&mut self, burst: &ToneBurst) -> Result<(), SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        sink.append(SamplesBuffer::new(1, burst.sample_rate, burst.samples.clone()));
        sink.sleep_until_end();
        Ok(())
    }
}

impl std::fmt::Debug for RodioToneSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioToneSink").finish_non_exhaustive()
    }
}

// ============================================================================
// MockToneSink
// ============================================================================

/// Mock sink for testing: records the frequency of every burst it plays.
///
/// Clones share the same record, so one clone can be handed to a
/// [`SinkFactory`] while the test keeps another.
#[derive(Debug, Clone, Default)]
pub struct MockToneSink {
    played: Arc<Mutex<Vec<f64>>>,
    should_fail: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
    play_delay: Arc<Mutex<Duration>>,
}

impl MockToneSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `play` call fail with a playback error.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Makes the factory report an unavailable device.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes each `play` call block for `delay`, like a real device.
    pub fn set_play_delay(&self, delay: Duration) {
        *self.play_delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// A factory handing out clones of this mock.
    #[must_use]
    pub fn factory(&self) -> SinkFactory {
        let mock = self.clone();
        Arc::new(move || {
            if mock.unavailable.load(Ordering::SeqCst) {
                return Err(SoundError::DeviceNotAvailable("mock device".to_string()));
            }
            Ok(Box::new(mock.clone()) as Box<dyn ToneSink>)
        })
    }

    /// Frequencies played so far, in playback order.
    #[must_use]
    pub fn played(&self) -> Vec<f64> {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Polls until `count` bursts have played or `timeout` elapses.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.play_count() >= count {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        self.play_count() >= count
    }
}

impl ToneSink for MockToneSink {
    fn play(&mut self, burst: &ToneBurst) -> Result<(), SoundError> {
        let delay = *self.play_delay.lock().unwrap_or_else(PoisonError::into_inner);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(burst.frequency);
        Ok(())
    }
}
