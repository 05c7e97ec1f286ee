//! Core data types for the sorting visualizer.
//!
//! This module defines the data structures used for:
//! - Step snapshots and the recorded step history
//! - Run parameters (sequence, algorithm, speed) with validation
//! - Value-to-frequency range mapping

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of values a run accepts.
pub const MIN_SEQUENCE_LEN: usize = 2;

// ============================================================================
// ParameterError
// ============================================================================

/// Input shape errors, raised before a run is allowed to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// The value list was empty or only whitespace.
    #[error("the value list is empty")]
    EmptyInput,

    /// A token could not be parsed as an integer.
    #[error("invalid value: \"{0}\"")]
    InvalidValue(String),

    /// Fewer values than a run requires.
    #[error("at least {min} values are required (got {got})")]
    TooFewValues {
        /// Required minimum
        min: usize,
        /// Number of values supplied
        got: usize,
    },

    /// Unknown algorithm name.
    #[error("unknown algorithm: \"{0}\"")]
    UnknownAlgorithm(String),

    /// Unknown speed name.
    #[error("unknown speed: \"{0}\"")]
    UnknownSpeed(String),
}

/// Parses a comma-separated list of integers such as `"5, 3, 8, 1"`.
///
/// # Errors
///
/// Returns `EmptyInput` for blank input, `InvalidValue` naming the first
/// token that is not a 32-bit integer, and `TooFewValues` when fewer than
/// [`MIN_SEQUENCE_LEN`] values are present.
pub fn parse_sequence(input: &str) -> Result<Vec<i32>, ParameterError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParameterError::EmptyInput);
    }

    let values = trimmed
        .split(',')
        .map(str::trim)
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|_| ParameterError::InvalidValue(token.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() < MIN_SEQUENCE_LEN {
        return Err(ParameterError::TooFewValues {
            min: MIN_SEQUENCE_LEN,
            got: values.len(),
        });
    }

    Ok(values)
}

// ============================================================================
// Step
// ============================================================================

/// Immutable snapshot of one sorting step.
///
/// Carries its own copy of the array and its own highlight set, so readers
/// never observe engine state that changed after the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    array: Vec<i32>,
    highlighted: Vec<usize>,
    complete: bool,
}

impl Step {
    /// Creates a step from an array state and highlighted indices.
    pub fn new(array: Vec<i32>, highlighted: Vec<usize>, complete: bool) -> Self {
        debug_assert!(
            highlighted.iter().all(|&idx| idx < array.len()),
            "highlight out of range: {highlighted:?} for len {}",
            array.len()
        );
        Self {
            array,
            highlighted,
            complete,
        }
    }

    /// Returns the array state at this step.
    pub fn array(&self) -> &[i32] {
        &self.array
    }

    /// Returns the highlighted indices, primary first.
    pub fn highlighted(&self) -> &[usize] {
        &self.highlighted
    }

    /// Returns true only for the final step of a run.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Values under the highlighted indices that are within bounds.
    pub fn highlighted_values(&self) -> impl Iterator<Item = i32> + '_ {
        self.highlighted
            .iter()
            .filter_map(|&idx| self.array.get(idx).copied())
    }
}

// ============================================================================
// StepHistory
// ============================================================================

/// Ordered, append-only sequence of steps produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepHistory {
    steps: Vec<Step>,
}

impl StepHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no steps are recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The initial (unsorted) step.
    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    /// The final step.
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Returns the step at `index`.
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Iterates over the steps in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Returns the steps as a slice.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns true if the history is a finished run: the first step has no
    /// highlights and the last step is complete, unhighlighted and sorted.
    pub fn is_finished(&self) -> bool {
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return false;
        };
        first.highlighted().is_empty()
            && last.highlighted().is_empty()
            && last.is_complete()
            && last.array().windows(2).all(|w| w[0] <= w[1])
    }
}

impl<'a> IntoIterator for &'a StepHistory {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl IntoIterator for StepHistory {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

// ============================================================================
// AlgorithmKind
// ============================================================================

/// The sort variants the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    /// In-place quicksort with Lomuto partitioning
    #[default]
    QuickSort,
    /// Top-down stable mergesort
    MergeSort,
}

impl AlgorithmKind {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::QuickSort => "Quick Sort",
            AlgorithmKind::MergeSort => "Merge Sort",
        }
    }

    /// Returns true if the variant preserves the order of equal elements.
    pub fn is_stable(&self) -> bool {
        matches!(self, AlgorithmKind::MergeSort)
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = ParameterError;

    /// Accepts names case- and space-insensitively: `quick`, `quicksort`,
    /// `Quick Sort`, `quick_sort`, `merge`, `Merge Sort`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "quick" | "quicksort" => Ok(AlgorithmKind::QuickSort),
            "merge" | "mergesort" => Ok(AlgorithmKind::MergeSort),
            _ => Err(ParameterError::UnknownAlgorithm(s.to_string())),
        }
    }
}

// ============================================================================
// SimulationSpeed
// ============================================================================

/// Replay cadence presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationSpeed {
    /// 800 ms per step
    Slow,
    /// 300 ms per step
    #[default]
    Normal,
    /// 80 ms per step
    Fast,
}

impl SimulationSpeed {
    /// Delay between steps in milliseconds.
    pub fn delay_ms(&self) -> u64 {
        match self {
            SimulationSpeed::Slow => 800,
            SimulationSpeed::Normal => 300,
            SimulationSpeed::Fast => 80,
        }
    }

    /// Delay between steps.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms())
    }
}

impl fmt::Display for SimulationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulationSpeed::Slow => "Slow",
            SimulationSpeed::Normal => "Normal",
            SimulationSpeed::Fast => "Fast",
        };
        f.write_str(name)
    }
}

impl FromStr for SimulationSpeed {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slow" => Ok(SimulationSpeed::Slow),
            "normal" => Ok(SimulationSpeed::Normal),
            "fast" => Ok(SimulationSpeed::Fast),
            _ => Err(ParameterError::UnknownSpeed(s.to_string())),
        }
    }
}

// ============================================================================
// RunParameters
// ============================================================================

/// Validated parameters for one visualization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    values: Vec<i32>,
    algorithm: AlgorithmKind,
    speed: SimulationSpeed,
}

impl RunParameters {
    /// Creates run parameters.
    ///
    /// # Errors
    ///
    /// Returns `TooFewValues` if fewer than [`MIN_SEQUENCE_LEN`] values are given.
    pub fn new(
        values: Vec<i32>,
        algorithm: AlgorithmKind,
        speed: SimulationSpeed,
    ) -> Result<Self, ParameterError> {
        if values.len() < MIN_SEQUENCE_LEN {
            return Err(ParameterError::TooFewValues {
                min: MIN_SEQUENCE_LEN,
                got: values.len(),
            });
        }
        Ok(Self {
            values,
            algorithm,
            speed,
        })
    }

    /// The input sequence.
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// The selected algorithm.
    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    /// The selected replay speed.
    pub fn speed(&self) -> SimulationSpeed {
        self.speed
    }
}

// ============================================================================
// FrequencyMap
// ============================================================================

/// Value domain used to interpolate tone frequencies.
///
/// `max` is always at least `min + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyMap {
    min: i64,
    max: i64,
}

impl Default for FrequencyMap {
    fn default() -> Self {
        Self { min: 0, max: 1 }
    }
}

impl FrequencyMap {
    /// Creates a range, clamping `max` up to `min + 1`.
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max: max.max(min.saturating_add(1)),
        }
    }

    /// Derives the range from a sequence; empty input yields the default.
    pub fn from_values(values: &[i32]) -> Self {
        let min = values.iter().copied().min();
        let max = values.iter().copied().max();
        match (min, max) {
            (Some(min), Some(max)) => Self::new(i64::from(min), i64::from(max)),
            _ => Self::default(),
        }
    }

    /// Lower bound of the value domain.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Effective upper bound of the value domain.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Position of `value` within the domain; 0.0 at `min`, 1.0 at `max`.
    pub fn ratio(&self, value: i64) -> f64 {
        (value - self.min) as f64 / (self.max - self.min) as f64
    }

    /// Linear map of `value` onto `[low_hz, high_hz]`.
    pub fn frequency(&self, value: i64, low_hz: f64, high_hz: f64) -> f64 {
        low_hz + self.ratio(value) * (high_hz - low_hz)
    }
}

// ============================================================================
// StopHandle
// ============================================================================

/// Shared cooperative stop flag.
///
/// Clones share the same flag. The engine checks it at every notification
/// and the replay loop at every step boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Creates a handle in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Returns true once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Returns true while no stop has been requested.
    pub fn should_continue(&self) -> bool {
        !self.is_stopped()
    }
}

// ============================================================================
// Tests
// ============================================================================
