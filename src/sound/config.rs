//! Tone synthesis configuration.

use serde::{Deserialize, Serialize};

fn default_sample_rate() -> u32 {
    44_100
}

fn default_duration_ms() -> u32 {
    60
}

fn default_freq_min() -> f64 {
    180.0
}

fn default_freq_max() -> f64 {
    1100.0
}

/// About 67% of `i16::MAX`, leaving headroom.
fn default_amplitude() -> f64 {
    22_000.0
}

fn default_fade_ms() -> u32 {
    8
}

fn default_queue_capacity() -> usize {
    64
}

/// Parameters for tone bursts and the tone request queue.
///
/// # Example
///
/// ```
/// use sortviz::sound::ToneConfig;
///
/// let config = ToneConfig::default();
/// assert_eq!(config.sample_rate, 44_100);
/// assert_eq!(config.duration_ms, 60);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneConfig {
    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Length of one tone burst in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,

    /// Frequency of the smallest value in the range.
    #[serde(default = "default_freq_min")]
    pub freq_min: f64,

    /// Frequency of the largest value in the range.
    #[serde(default = "default_freq_max")]
    pub freq_max: f64,

    /// Peak sample amplitude on the 16-bit scale.
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,

    /// Upper bound for the fade-in and fade-out ramps in milliseconds.
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u32,

    /// Maximum number of queued tone requests; extra requests are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            duration_ms: default_duration_ms(),
            freq_min: default_freq_min(),
            freq_max: default_freq_max(),
            amplitude: default_amplitude(),
            fade_ms: default_fade_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl ToneConfig {
    /// Number of samples in one burst.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        (u64::from(self.sample_rate) * u64::from(self.duration_ms) / 1000) as usize
    }

    /// Length of each envelope ramp in samples:
    /// `min(sample_count / 6, fade_ms worth of samples)`.
    #[must_use]
    pub fn fade_samples(&self) -> usize {
        let cap = (u64::from(self.sample_rate) * u64::from(self.fade_ms) / 1000) as usize;
        (self.sample_count() / 6).min(cap)
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample_rate must be greater than 0".to_string());
        }
        if self.duration_ms == 0 {
            return Err("duration_ms must be greater than 0".to_string());
        }
        if !(self.freq_min > 0.0 && self.freq_min < self.freq_max) {
            return Err("freq_min must be positive and below freq_max".to_string());
        }
        if !(self.amplitude > 0.0 && self.amplitude <= f64::from(i16::MAX)) {
            return Err(format!("amplitude must be in (0, {}]", i16::MAX));
        }
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}
