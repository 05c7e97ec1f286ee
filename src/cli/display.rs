//! Display utilities for the sortviz CLI.
//!
//! This module provides formatted output for:
//! - The run header
//! - The horizontal bar chart for each step
//! - Completion, cancellation and error messages

use crate::types::{FrequencyMap, RunParameters, Step};

/// Widest bar, in characters.
const BAR_WIDTH: usize = 40;

/// Clears the screen and homes the cursor.
const CLEAR: &str = "\x1b[2J\x1b[H";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// One-line summary of a run, repainted above every frame.
    pub fn header(parameters: &RunParameters, muted: bool) -> String {
        let algorithm = parameters.algorithm();
        format!(
            "{}{} | {} ({} ms/step) | {} values{}",
            algorithm,
            if algorithm.is_stable() { " (stable)" } else { "" },
            parameters.speed(),
            parameters.speed().delay_ms(),
            parameters.values().len(),
            if muted { " | muted" } else { "" }
        )
    }

    /// Paints the unsorted input before the first step.
    pub fn show_reset(header: &str, values: &[i32]) {
        print!("{}", Self::frame(header, 0, values, &[], false));
    }

    /// Redraws the chart for one step.
    pub fn show_step(header: &str, step: &Step, number: usize) {
        print!(
            "{}",
            Self::frame(
                header,
                number,
                step.array(),
                step.highlighted(),
                step.is_complete()
            )
        );
    }

    /// A full screen: clear, header, step counter and bars.
    pub fn frame(
        header: &str,
        number: usize,
        values: &[i32],
        highlighted: &[usize],
        complete: bool,
    ) -> String {
        format!(
            "{CLEAR}{header}\nStep {number}\n{}",
            Self::render_bars(values, highlighted, complete)
        )
    }

    /// Shows the completion line.
    pub fn show_complete(steps: usize) {
        println!("* Sorted in {steps} steps");
    }

    /// Shows the cancellation line.
    pub fn show_cancelled(steps_shown: usize) {
        println!("[] Stopped after {steps_shown} steps");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Renders one line per value.
    ///
    /// The primary highlight is marked `>`, the secondary `+`; every bar is
    /// marked `=` once sorting is complete.
    pub fn render_bars(values: &[i32], highlighted: &[usize], complete: bool) -> String {
        let map = FrequencyMap::from_values(values);
        let label_width = values
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);

        let mut out = String::new();
        for (index, &value) in values.iter().enumerate() {
            let marker = if complete {
                '='
            } else if highlighted.first() == Some(&index) {
                '>'
            } else if highlighted.contains(&index) {
                '+'
            } else {
                ' '
            };
            let bar = "#".repeat(Self::bar_len(value, &map));
            out.push_str(&format!("{marker} {value:>label_width$} |{bar}\n"));
        }
        out
    }

    /// Bar length for `value`: 1 at the minimum up to [`BAR_WIDTH`] at the maximum.
    fn bar_len(value: i32, map: &FrequencyMap) -> usize {
        let scaled = map.ratio(i64::from(value)) * (BAR_WIDTH - 1) as f64;
        1 + scaled.round().clamp(0.0, (BAR_WIDTH - 1) as f64) as usize
    }
}
