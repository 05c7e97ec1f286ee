//! Sorting Visualizer Library
//!
//! This library provides the core functionality for the sortviz CLI.
//! It includes:
//! - Instrumented quicksort and mergesort that record every step
//! - Paced replay of the recorded history with cancellation
//! - Non-blocking sine-wave tone synthesis tracking the compared values
//! - A session controller emitting reset/step/completion events
//! - Configuration loading and CLI command parsing

pub mod cli;
pub mod config;
pub mod controller;
pub mod replay;
pub mod sort;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    parse_sequence, AlgorithmKind, FrequencyMap, ParameterError, RunParameters, SimulationSpeed,
    Step, StepHistory, StopHandle,
};

pub use config::{AppConfig, ConfigError};
pub use controller::{Visualizer, VisualizerEvent};
pub use replay::{ReplayOutcome, ReplayScheduler};
pub use sort::{RunStatus, SortEngine, SortError, SortObserver, StepRecorder};
pub use sound::{
    MockTonePlayer, MockToneSink, RodioToneSink, SoundError, ToneConfig, TonePlayer,
    ToneSynthesizer,
};
