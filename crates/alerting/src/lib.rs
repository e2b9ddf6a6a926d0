//! Alerting System
//!
//! Turns the per-frame alert decision into alert events: per-condition
//! cooldown, tone description, and sinks.

mod manager;
mod sink;

pub use manager::{AlertConfig, AlertError, AlertEvent, AlertManager, AlertState, AlertTone};
pub use sink::{AlertSink, LogSink, RecordingSink};
