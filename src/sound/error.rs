//! Sound system error types.
//!
//! None of these errors reach the replay loop. The audio worker logs them
//! and drops the affected tone.

use thiserror::Error;

/// Errors that can occur in the tone playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no output device, device busy).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create an output stream or sink.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Playback of a synthesized burst failed.
    #[error("tone playback failed: {0}")]
    PlaybackError(String),

    /// The background audio worker could not be started.
    #[error("audio worker unavailable: {0}")]
    WorkerUnavailable(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    ///
    /// The worker reopens the device on the next tone after such an error.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }
}
