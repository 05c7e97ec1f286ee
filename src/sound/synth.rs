//! Sine-wave tone burst synthesis.
//!
//! Produces 16-bit signed mono PCM with a linear fade-in at the head and a
//! symmetric fade-out at the tail so bursts start and end without clicks.

use std::f64::consts::TAU;

use super::config::ToneConfig;

/// One synthesized burst, ready for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneBurst {
    /// Pitch of the burst in Hz.
    pub frequency: f64,
    /// Sample rate of `samples`.
    pub sample_rate: u32,
    /// Mono 16-bit samples.
    pub samples: Vec<i16>,
}

impl ToneBurst {
    /// Largest absolute sample value.
    #[must_use]
    pub fn peak(&self) -> u16 {
        self.samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }
}

/// Envelope gain for sample `i` of `total`, with ramps of `fade` samples.
fn envelope(i: usize, total: usize, fade: usize) -> f64 {
    if i < fade {
        i as f64 / fade as f64
    } else if i > total - fade {
        (total - i) as f64 / fade as f64
    } else {
        1.0
    }
}

/// Synthesizes a burst at `frequency` using the sizing in `config`.
#[must_use]
pub fn synthesize_tone(frequency: f64, config: &ToneConfig) -> ToneBurst {
    let total = config.sample_count();
    let fade = config.fade_samples();
    let rate = f64::from(config.sample_rate);

    let samples = (0..total)
        .map(|i| {
            let t = i as f64 / rate;
            let sine = (TAU * frequency * t).sin();
            (sine * config.amplitude * envelope(i, total, fade)) as i16
        })
        .collect();

    ToneBurst {
        frequency,
        sample_rate: config.sample_rate,
        samples,
    }
}
