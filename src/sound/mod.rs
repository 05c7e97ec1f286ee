//! Tone feedback for the sorting visualizer.
//!
//! This module turns values into short sine-wave bursts:
//!
//! - Linear value-to-frequency mapping over the run's value range
//! - 16-bit mono PCM synthesis with a click-free envelope
//! - A single background worker so playback never blocks the caller
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  try_send   ┌──────────────────┐
//! │ ToneSynthesizer  │────────────▶│  bounded FIFO    │
//! │  (play_tone)     │             └────────┬─────────┘
//! └──────────────────┘                      │
//!                                           ▼
//!                                  ┌──────────────────┐     ┌──────────────┐
//!                                  │ sort-audio thread│────▶│  ToneSink    │
//!                                  │ synthesize_tone  │     │ (rodio/mock) │
//!                                  └──────────────────┘     └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use sortviz::sound::{ToneConfig, ToneSynthesizer};
//!
//! let synth = ToneSynthesizer::new(ToneConfig::default()).expect("audio worker");
//! synth.set_range(1, 100);
//! synth.play_tone(42); // returns immediately
//! ```

mod config;
mod error;
mod sink;
mod synth;
mod synthesizer;

pub use config::ToneConfig;
pub use error::SoundError;
pub use sink::{MockToneSink, RodioToneSink, SinkFactory, ToneSink};
pub use synth::{synthesize_tone, ToneBurst};
pub use synthesizer::ToneSynthesizer;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::types::FrequencyMap;

/// Trait for tone feedback implementations.
///
/// Every method is fire-and-forget: nothing here reports errors or blocks
/// on audio output.
pub trait TonePlayer: Send + Sync {
    /// Requests a tone for `value`.
    fn play_tone(&self, value: i32);

    /// Sets the value range used for pitch mapping.
    fn set_range(&self, min: i32, max: i32);

    /// Discards pending tones.
    fn reset(&self);

    /// Enables or disables future tones.
    fn set_muted(&self, muted: bool);

    /// Returns true if tones are disabled.
    fn is_muted(&self) -> bool;
}

/// Mock tone player for testing.
#[derive(Debug, Default)]
pub struct MockTonePlayer {
    values: Mutex<Vec<i32>>,
    range: Mutex<Option<FrequencyMap>>,
    muted: AtomicBool,
    resets: AtomicUsize,
}

impl MockTonePlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values requested while unmuted, in order.
    #[must_use]
    pub fn played(&self) -> Vec<i32> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The last range set, if any.
    #[must_use]
    pub fn range(&self) -> Option<FrequencyMap> {
        *self.range.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl TonePlayer for MockTonePlayer {
    fn play_tone(&self, value: i32) {
        if self.muted.load(Ordering::SeqCst) {
            return;
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
    }

    fn set_range(&self, min: i32, max: i32) {
        *self.range.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(FrequencyMap::new(i64::from(min), i64::from(max)));
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }
}
