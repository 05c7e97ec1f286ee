//! Non-blocking tone synthesizer.
//!
//! `play_tone` maps a value to a frequency and enqueues it on a bounded FIFO
//! channel. A single dedicated worker thread synthesizes each burst and plays
//! it to completion before taking the next request, so tones play in
//! submission order and the caller never waits on the device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, trace, warn};

use super::config::ToneConfig;
use super::error::SoundError;
use super::sink::{RodioToneSink, SinkFactory, ToneSink};
use super::synth::synthesize_tone;
use super::TonePlayer;
use crate::types::FrequencyMap;

const WORKER_THREAD_NAME: &str = "sort-audio";

/// One queued tone request.
#[derive(Debug, Clone, Copy)]
struct ToneRequest {
    frequency: f64,
}

/// Handle to one generation of the audio worker.
struct Worker {
    tx: Sender<ToneRequest>,
    cancelled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(config: &ToneConfig, factory: &SinkFactory) -> Result<Self, SoundError> {
        let (tx, rx) = bounded(config.queue_capacity);
        let cancelled = Arc::new(AtomicBool::new(false));

        let handle = {
            let config = config.clone();
            let factory = Arc::clone(factory);
            let cancelled = Arc::clone(&cancelled);
            thread::Builder::new()
                .name(WORKER_THREAD_NAME.to_string())
                .spawn(move || worker_loop(&rx, &config, &factory, &cancelled))
                .map_err(|e| SoundError::WorkerUnavailable(e.to_string()))?
        };

        debug!("Audio worker started");
        Ok(Self {
            tx,
            cancelled,
            handle,
        })
    }

    /// Cancels queued requests and lets the thread exit on its own.
    ///
    /// A burst already playing finishes; everything behind it is discarded.
    fn retire(self) -> JoinHandle<()> {
        self.cancelled.store(true, Ordering::SeqCst);
        drop(self.tx);
        self.handle
    }
}

fn worker_loop(
    rx: &Receiver<ToneRequest>,
    config: &ToneConfig,
    factory: &SinkFactory,
    cancelled: &AtomicBool,
) {
    let mut sink: Option<Box<dyn ToneSink>> = None;

    for request in rx.iter() {
        if cancelled.load(Ordering::SeqCst) {
            trace!("Discarding cancelled tone request");
            continue;
        }

        if sink.is_none() {
            match factory() {
                Ok(opened) => sink = Some(opened),
                Err(e) => {
                    debug!("Audio output unavailable, dropping tone: {}", e);
                    continue;
                }
            }
        }

        let burst = synthesize_tone(request.frequency, config);
        trace!(frequency = burst.frequency, peak = burst.peak(), "Playing tone");
        if let Some(active) = sink.as_mut() {
            if let Err(e) = active.play(&burst) {
                debug!("Tone playback failed, dropping tone: {}", e);
                if e.is_device_error() {
                    sink = None;
                }
            }
        }
    }

    debug!("Audio worker exiting");
}

/// Plays sine-wave tone bursts whose pitch tracks a value.
///
/// All methods take `&self`; the synthesizer can be shared across threads
/// behind an `Arc`.
pub struct ToneSynthesizer {
    config: ToneConfig,
    factory: SinkFactory,
    range: Mutex<FrequencyMap>,
    muted: AtomicBool,
    shut_down: AtomicBool,
    worker: Mutex<Option<Worker>>,
}

impl ToneSynthesizer {
    /// Creates a synthesizer on the default rodio output device.
    ///
    /// The device is opened lazily by the worker on the first tone, so this
    /// succeeds on machines without audio hardware; tones are then dropped.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::WorkerUnavailable` if the worker thread cannot be
    /// spawned.
    pub fn new(config: ToneConfig) -> Result<Self, SoundError> {
        Self::with_sink_factory(config, RodioToneSink::factory())
    }

    /// Creates a synthesizer whose worker opens sinks through `factory`.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::WorkerUnavailable` if the worker thread cannot be
    /// spawned.
    pub fn with_sink_factory(config: ToneConfig, factory: SinkFactory) -> Result<Self, SoundError> {
        let worker = Worker::spawn(&config, &factory)?;
        Ok(Self {
            config,
            factory,
            range: Mutex::new(FrequencyMap::default()),
            muted: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Records the value domain; `max` is clamped to at least `min + 1`.
    pub fn set_range(&self, min: i32, max: i32) {
        let map = FrequencyMap::new(i64::from(min), i64::from(max));
        *lock(&self.range) = map;
        debug!(min = map.min(), max = map.max(), "Tone range set");
    }

    /// Returns the current value domain.
    pub fn range(&self) -> FrequencyMap {
        *lock(&self.range)
    }

    /// Frequency that `value` maps to under the current range.
    pub fn frequency_for(&self, value: i32) -> f64 {
        self.range()
            .frequency(i64::from(value), self.config.freq_min, self.config.freq_max)
    }

    /// Enqueues a tone for `value` and returns immediately.
    ///
    /// Skipped when muted, after shutdown, or when the queue is full.
    pub fn play_tone(&self, value: i32) {
        if self.is_muted() || self.is_shut_down() {
            return;
        }

        let request = ToneRequest {
            frequency: self.frequency_for(value),
        };

        let guard = lock(&self.worker);
        let Some(worker) = guard.as_ref() else {
            return;
        };
        match worker.tx.try_send(request) {
            Ok(()) => trace!(value, frequency = request.frequency, "Tone queued"),
            Err(TrySendError::Full(_)) => trace!(value, "Tone queue full, dropping tone"),
            Err(TrySendError::Disconnected(_)) => debug!("Audio worker gone, dropping tone"),
        }
    }

    /// Mutes or unmutes future `play_tone` calls; queued tones still play.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
        debug!(muted, "Tone mute changed");
    }

    /// Returns true if `play_tone` is currently a no-op.
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    /// Discards all queued tones and starts a fresh worker.
    ///
    /// A burst in flight finishes on the old worker, which then exits.
    pub fn reset(&self) {
        if self.is_shut_down() {
            return;
        }

        let mut guard = lock(&self.worker);
        if let Some(old) = guard.take() {
            // Detached: the old thread exits once its current burst drains
            drop(old.retire());
        }
        match Worker::spawn(&self.config, &self.factory) {
            Ok(worker) => *guard = Some(worker),
            Err(e) => warn!("Failed to restart audio worker, tones disabled: {}", e),
        }
    }

    /// Stops the worker; every later `play_tone` is a silent no-op.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }

        let old = lock(&self.worker).take();
        if let Some(old) = old {
            if old.retire().join().is_err() {
                warn!("Audio worker panicked");
            }
        }
        debug!("Tone synthesizer shut down");
    }

    /// Returns true after [`shutdown`](Self::shutdown).
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl Drop for ToneSynthesizer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ToneSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneSynthesizer")
            .field("range", &self.range())
            .field("muted", &self.is_muted())
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}

impl TonePlayer for ToneSynthesizer {
    fn play_tone(&self, value: i32) {
        ToneSynthesizer::play_tone(self, value)
    }

    fn set_range(&self, min: i32, max: i32) {
        ToneSynthesizer::set_range(self, min, max)
    }

    fn reset(&self) {
        ToneSynthesizer::reset(self)
    }

    fn set_muted(&self, muted: bool) {
        ToneSynthesizer::set_muted(self, muted)
    }

    fn is_muted(&self) -> bool {
        ToneSynthesizer::is_muted(self)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
