//! Driver Monitoring Session Driver
//!
//! Loads configuration, sets up logging, and drives monitoring sessions from
//! recorded face mesh landmark streams.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub mod replay;
pub mod settings;

pub use replay::{FrameRecord, Replay, ReplaySummary};
pub use settings::{LogConfig, MonitorConfig};

/// Session driver errors
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Recording contains no frames")]
    EmptyRecording,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Dms(#[from] dms::DmsError),

    #[error(transparent)]
    Alert(#[from] alerting::AlertError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Initialize logging to stderr; `RUST_LOG` overrides the configured level
pub fn init_logging(config: &LogConfig) -> Result<(), MonitorError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| MonitorError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| MonitorError::Logging(e.to_string()))
}
