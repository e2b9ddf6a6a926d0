//! Alert Manager Implementation

use std::collections::HashMap;

use dms::{should_alert, Condition, DetectionState};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

const NANOS_PER_MS: u64 = 1_000_000;

/// Alert configuration errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AlertError {
    #[error("Invalid alert tone: {0}")]
    Tone(String),
}

/// Audible alert description handed to the audio collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertTone {
    /// Sine frequency (Hz)
    pub frequency_hz: f64,
    /// Tone length (ms)
    pub duration_ms: u64,
    /// Starting gain (0-1)
    pub gain: f64,
    /// Gain at the end of the exponential ramp
    pub end_gain: f64,
}

impl Default for AlertTone {
    fn default() -> Self {
        Self {
            frequency_hz: 800.0,
            duration_ms: 500,
            gain: 0.3,
            end_gain: 0.01,
        }
    }
}

/// Alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum gap between two alerts for the same condition (ms).
    /// Zero fires on every unsafe frame.
    pub cooldown_ms: u64,
    /// Tone to play for each alert
    pub tone: AlertTone,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 0,
            tone: AlertTone::default(),
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> Result<(), AlertError> {
        let tone = &self.tone;
        if !(tone.frequency_hz.is_finite() && tone.frequency_hz > 0.0) {
            return Err(AlertError::Tone(format!("frequency_hz must be positive, got {}", tone.frequency_hz)));
        }
        // Exponential ramps cannot reach or start from zero
        for (field, gain) in [("gain", tone.gain), ("end_gain", tone.end_gain)] {
            if !(gain > 0.0 && gain <= 1.0) {
                return Err(AlertError::Tone(format!("{field} must be in (0, 1], got {gain}")));
            }
        }
        Ok(())
    }
}

/// State of an alert
#[derive(Debug, Clone)]
pub struct AlertState {
    /// Last time this alert was fired (ns)
    pub last_fired_ns: u64,
    /// Number of times fired
    pub fire_count: usize,
}

/// Alert to be rendered by a sink
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    /// Conditions that triggered this alert
    pub conditions: Vec<Condition>,
    pub tone: AlertTone,
    pub timestamp_ns: u64,
}

/// Per-condition cooldown over the per-frame alert decision
pub struct AlertManager {
    /// Configuration
    config: AlertConfig,
    /// Alert states by condition
    states: HashMap<Condition, AlertState>,
}

impl AlertManager {
    /// Create a new alert manager
    pub fn new(config: AlertConfig) -> Self {
        info!("Creating alert manager with config: {:?}", config);
        Self {
            config,
            states: HashMap::new(),
        }
    }

    /// Check if a condition is outside its cooldown
    pub fn should_fire(&self, condition: Condition, now_ns: u64) -> bool {
        match self.states.get(&condition) {
            Some(state) if self.config.cooldown_ms > 0 => {
                let elapsed_ms = now_ns.saturating_sub(state.last_fired_ns) / NANOS_PER_MS;
                elapsed_ms >= self.config.cooldown_ms
            }
            _ => true,
        }
    }

    /// Record that an alert was fired for a condition
    pub fn record_fire(&mut self, condition: Condition, now_ns: u64) {
        let state = self.states.entry(condition).or_insert(AlertState {
            last_fired_ns: now_ns,
            fire_count: 0,
        });

        state.last_fired_ns = now_ns;
        state.fire_count += 1;

        debug!("Alert recorded: {} (count: {})", condition.as_str(), state.fire_count);
    }

    /// Turn one frame's state into an alert, if any condition is due
    pub fn on_frame(&mut self, state: &DetectionState, now_ns: u64) -> Option<AlertEvent> {
        if !should_alert(state) {
            return None;
        }

        let due: Vec<Condition> = state
            .active_conditions()
            .into_iter()
            .filter(|c| self.should_fire(*c, now_ns))
            .collect();

        if due.is_empty() {
            debug!("Alert suppressed: in cooldown period");
            return None;
        }

        for condition in &due {
            self.record_fire(*condition, now_ns);
        }

        Some(AlertEvent {
            conditions: due,
            tone: self.config.tone.clone(),
            timestamp_ns: now_ns,
        })
    }

    /// Number of alerts fired for a condition
    pub fn fire_count(&self, condition: Condition) -> usize {
        self.states.get(&condition).map_or(0, |s| s.fire_count)
    }

    /// Clear all alert states
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}
