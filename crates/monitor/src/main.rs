//! Driver Monitor - replays a landmark recording and prints the session report

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use alerting::LogSink;
use anyhow::Context;
use clap::Parser;
use monitor::replay::read_recording;
use monitor::{init_logging, MonitorConfig, Replay};
use tracing::info;

#[derive(Parser)]
#[command(name = "driver-monitor", version, about = "Driver state monitoring over face mesh recordings")]
struct Cli {
    /// JSON-lines landmark recording
    recording: PathBuf,

    /// Configuration file (TOML, JSON, or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print every frame's detection state as a JSON line
    #[arg(long)]
    frames: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = MonitorConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config.log)?;

    info!("=== Driver Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &cli.config {
        info!("Loaded configuration from {}", path.display());
    }

    let file = File::open(&cli.recording)
        .with_context(|| format!("opening recording {}", cli.recording.display()))?;
    let frames = read_recording(BufReader::new(file))
        .with_context(|| format!("reading recording {}", cli.recording.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut replay = Replay::new(&config)?;
    let summary = replay
        .run(&frames, LogSink, |frame, outcome| {
            if cli.frames {
                let line = serde_json::json!({
                    "timestamp_ms": frame.timestamp_ms,
                    "state": outcome.state,
                    "alert": outcome.alert,
                });
                writeln!(out, "{line}")?;
            }
            Ok(())
        })
        .await?;

    info!(
        frames = summary.frames,
        without_face = summary.frames_without_face,
        dropped = summary.dropped_frames,
        alerts = summary.alerts,
        "Replay finished"
    );

    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary.report)?)?;
    } else {
        writeln!(out, "{}", summary.report)?;
    }

    Ok(())
}
