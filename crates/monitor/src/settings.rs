//! Layered configuration: defaults, optional file, `DRIVER_MONITOR__*` environment

use std::path::Path;

use alerting::AlertConfig;
use config::{Config, Environment, File};
use dms::DmsConfig;
use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Environment variable prefix; nested keys use `__`
pub const ENV_PREFIX: &str = "DRIVER_MONITOR";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `dms=debug`
    pub level: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Full driver configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub dms: DmsConfig,
    pub alert: AlertConfig,
    pub log: LogConfig,
}

impl MonitorConfig {
    /// Load from an optional file (format from extension) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, MonitorError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: MonitorConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section; invalid thresholds fail here, never per frame
    pub fn validate(&self) -> Result<(), MonitorError> {
        self.dms.validate()?;
        self.alert.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_sources() {
        let config = MonitorConfig::load(None).unwrap();
        assert_eq!(config.dms, DmsConfig::default());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_file_overrides_single_threshold() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dms]\ndrowsy_ear_threshold = 0.25\n\n[alert]\ncooldown_ms = 2000").unwrap();

        let config = MonitorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.dms.drowsy_ear_threshold, 0.25);
        assert_eq!(config.dms.distraction_yaw_threshold, 150.0);
        assert_eq!(config.alert.cooldown_ms, 2000);
    }

    #[test]
    fn test_negative_threshold_rejected_at_load() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dms]\nphone_pitch_threshold = -5.0").unwrap();

        let err = MonitorConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, MonitorError::Dms(_)));
    }

    #[derive(Clone, Default)]
    struct SharedBuf(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_load_emits_no_events_before_logging_is_set_up() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[log]\nlevel = \"debug\"").unwrap();

        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            MonitorConfig::load(Some(file.path()))
        })
        .unwrap();

        assert_eq!(config.log.level, "debug");
        assert!(buf.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = MonitorConfig::load(Some(Path::new("/nonexistent/driver-monitor.toml")));
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }
}
