//! Command definitions for the sortviz CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{parse_sequence, AlgorithmKind, SimulationSpeed};

// ============================================================================
// CLI Structure
// ============================================================================

/// Sorting visualizer with audio feedback
#[derive(Parser, Debug)]
#[command(
    name = "sortviz",
    version,
    about = "Animate sorting algorithms in the terminal with synchronized tones",
    long_about = "Runs quicksort or mergesort over a list of integers, records every \
                  comparison and write, then replays the steps as a bar chart while \
                  playing a tone for each highlighted value.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a JSON config file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sort and animate a list of values with tones
    Run(RunArgs),

    /// Record the step history and print it as JSON
    Trace(TraceArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Arguments
// ============================================================================

/// A parsed, comma-separated value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueList(pub Vec<i32>);

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Comma-separated integers, at least two (e.g. "50,87,56,12")
    #[arg(long, value_parser = parse_value_list, allow_hyphen_values = true)]
    pub values: ValueList,

    /// Algorithm: quick or merge
    #[arg(short, long)]
    pub algorithm: Option<AlgorithmKind>,

    /// Replay speed: slow (800ms), normal (300ms) or fast (80ms)
    #[arg(short, long)]
    pub speed: Option<SimulationSpeed>,

    /// Disable tones
    #[arg(short, long)]
    pub mute: bool,
}

/// Arguments for the trace command
#[derive(Args, Debug, Clone)]
pub struct TraceArgs {
    /// Comma-separated integers, at least two
    #[arg(long, value_parser = parse_value_list, allow_hyphen_values = true)]
    pub values: ValueList,

    /// Algorithm: quick or merge
    #[arg(short, long)]
    pub algorithm: Option<AlgorithmKind>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

fn parse_value_list(s: &str) -> Result<ValueList, String> {
    parse_sequence(s).map(ValueList).map_err(|e| e.to_string())
}

// ============================================================================
// Tests
// ============================================================================
