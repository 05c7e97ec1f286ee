//! CLI module for sortviz.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Bar chart rendering and message output

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, RunArgs, TraceArgs, ValueList};
pub use display::Display;
