//! sortviz - watch and hear sorting algorithms work
//!
//! Records every comparison and write of a quicksort or mergesort run, then
//! replays the steps as a terminal bar chart with a tone per highlighted
//! value.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use serde::Serialize;
use tokio::sync::mpsc;

use sortviz::cli::{Cli, Commands, Display, RunArgs, TraceArgs};
use sortviz::{
    AlgorithmKind, AppConfig, RunParameters, SortEngine, StepHistory, StepRecorder, TonePlayer,
    ToneSynthesizer, Visualizer, VisualizerEvent,
};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            run(args, config).await?;
        }
        Some(Commands::Trace(args)) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            trace(args, &config)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Sorts, then animates the history with tones until done or Ctrl-C.
async fn run(args: RunArgs, config: AppConfig) -> Result<()> {
    let parameters = RunParameters::new(
        args.values.0,
        args.algorithm.unwrap_or(config.default_algorithm),
        args.speed.unwrap_or(config.default_speed),
    )?;

    let synth = Arc::new(
        ToneSynthesizer::new(config.tone.clone()).context("Failed to start audio worker")?,
    );
    synth.set_muted(args.mute || config.muted);
    let tones: Arc<dyn TonePlayer> = synth.clone();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut visualizer = Visualizer::new(tones, tx);

    let header = Display::header(&parameters, visualizer.is_muted());
    let renderer = tokio::spawn(render_events(header, rx));

    visualizer.prepare(parameters)?;

    let stop = visualizer.stop_handle();
    let signal_synth = Arc::clone(&synth);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping");
            stop.stop();
            signal_synth.reset();
        }
    });

    let outcome = visualizer.run().await?;
    drop(visualizer);
    renderer.await.context("Renderer task failed")?;

    if outcome.is_completed() {
        Display::show_complete(outcome.steps_shown());
    } else {
        Display::show_cancelled(outcome.steps_shown());
    }

    synth.shutdown();
    Ok(())
}

/// Redraws the chart for every event until the controller is dropped.
async fn render_events(header: String, mut rx: mpsc::UnboundedReceiver<VisualizerEvent>) {
    let mut shown = 0;
    while let Some(event) = rx.recv().await {
        match event {
            VisualizerEvent::Reset { values } => {
                shown = 0;
                Display::show_reset(&header, &values);
            }
            VisualizerEvent::Step(step) => {
                shown += 1;
                Display::show_step(&header, &step, shown);
            }
            VisualizerEvent::Complete => {}
        }
    }
}

/// JSON document printed by `trace`.
#[derive(Serialize)]
struct TraceOutput<'a> {
    algorithm: AlgorithmKind,
    input: &'a [i32],
    permutation: &'a [usize],
    steps: &'a StepHistory,
}

/// Records the history without replay or audio and prints it as JSON.
fn trace(args: TraceArgs, config: &AppConfig) -> Result<()> {
    let algorithm = args.algorithm.unwrap_or(config.default_algorithm);
    let values = args.values.0;

    let mut recorder = StepRecorder::new();
    let status = SortEngine::new(algorithm).run(&values, &mut recorder)?;
    let history = recorder.into_history();

    let output = TraceOutput {
        algorithm,
        input: &values,
        permutation: status.permutation().unwrap_or_default(),
        steps: &history,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["sortviz"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["sortviz", "run", "--values", "1,2"]);
        assert!(matches!(cli.command, Some(Commands::Run(_))));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["sortviz", "--verbose", "trace", "--values", "1,2"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_trace_output_shape() {
        let history = sortviz::sort::record(AlgorithmKind::QuickSort, &[2, 1]).unwrap();
        let output = TraceOutput {
            algorithm: AlgorithmKind::QuickSort,
            input: &[2, 1],
            permutation: &[1, 0],
            steps: &history,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["algorithm"], "quick_sort");
        assert_eq!(value["permutation"], serde_json::json!([1, 0]));
        assert_eq!(value["steps"].as_array().unwrap().len(), 4);
        assert_eq!(value["steps"][3]["complete"], true);
    }
}
