//! Fallwatch command-line monitor.
//!
//! Replays a landmark stream through the fall monitoring engine, printing a
//! status per frame and a report at the end. Type `q` + Enter (or press
//! Ctrl-C) to quit and `r` + Enter to reset the alert counters.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fallwatch::report::{self, OutputFormat};
use fallwatch::{
    ControlCommand, FallMonitor, LandmarkStream, LoopOptions, MonitorConfig, MonitorLoop,
    ReplaySource, StopReason,
};

/// Fall and immobility monitor for pose landmark streams
#[derive(Parser, Debug)]
#[command(name = "fallwatch")]
#[command(author, version, about)]
struct Cli {
    /// JSON Lines landmark stream; prompted for when omitted
    path: Option<PathBuf>,

    /// JSON configuration file overriding the default thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many frames instead of looping until quit
    #[arg(long)]
    max_frames: Option<u64>,

    /// Minimum time per frame in milliseconds
    #[arg(long, default_value_t = 30)]
    frame_delay_ms: u64,

    /// Status and summary output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.format == OutputFormat::Text {
        report::write_banner(&mut out)?;
    }

    let path = match cli.path.clone() {
        Some(path) => path,
        // Prompt on stderr so stdout carries only status records.
        None => prompt_for_path(&mut io::stderr(), &mut io::stdin().lock())?,
    };
    if !path.is_file() {
        bail!(
            "file not found or not a regular file: {} (make sure it exists and is a landmark stream)",
            path.display()
        );
    }

    let config = match &cli.config {
        Some(config_path) => MonitorConfig::from_json_file(config_path)
            .with_context(|| format!("loading configuration {}", config_path.display()))?,
        None => MonitorConfig::default(),
    };

    let stream = LandmarkStream::open(&path)?;
    info!(path = %path.display(), "landmark stream loaded");
    let mut source = ReplaySource::new(stream);

    let commands = spawn_command_reader()?;
    let mut runner = MonitorLoop::new(
        FallMonitor::new(config),
        LoopOptions {
            frame_budget: Duration::from_millis(cli.frame_delay_ms),
            max_frames: cli.max_frames,
            format: cli.format,
        },
    );

    let outcome = runner.run(&mut source, || commands.try_recv().ok(), &mut out);

    report::write_summary(&mut out, &outcome.summary, cli.format)?;
    out.flush()?;

    match outcome.stop_reason {
        StopReason::Failed(e) => Err(e).context("monitoring stopped on error"),
        _ => Ok(()),
    }
}

/// Ask for the stream path, dropping surrounding quotes.
fn prompt_for_path<W: Write, R: BufRead>(prompt: &mut W, input: &mut R) -> anyhow::Result<PathBuf> {
    write!(prompt, "Enter the path of the landmark stream file: ")?;
    prompt.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("reading path from stdin")?;
    Ok(clean_path(&line))
}

fn clean_path(input: &str) -> PathBuf {
    let trimmed = input.trim().trim_matches('"').trim_matches('\'');
    Path::new(trimmed).to_path_buf()
}

/// Forward `q` / `r` lines from stdin and Ctrl-C to the frame loop.
fn spawn_command_reader() -> anyhow::Result<Receiver<ControlCommand>> {
    let (tx, rx) = mpsc::channel();
    install_interrupt_handler(tx.clone())?;
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "stopped reading commands");
                    break;
                }
            };
            if let Some(command) = ControlCommand::parse(&line) {
                if tx.send(command).is_err() {
                    break;
                }
            }
        }
    });
    Ok(rx)
}

/// Turn SIGINT into a quit command so the final report is still written.
fn install_interrupt_handler(tx: Sender<ControlCommand>) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        info!("interrupt received, stopping");
        let _ = tx.send(ControlCommand::Quit);
    })
    .context("installing Ctrl-C handler")
}
