//! Driver Monitoring System (DMS)
//!
//! Driver state inference from face mesh landmarks:
//! - Eye aspect ratio and head pose proxies
//! - Drowsiness, distraction, and phone use classification
//! - Per-session unsafe time accounting and safety score
//! - Per-frame alert decision

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod gate;
pub mod geometry;
pub mod landmarks;
pub mod processor;
pub mod session;
pub mod state;

pub use analysis::{should_alert, FrameOutcome};
pub use classifier::{is_distracted, is_drowsy, is_using_phone, Classifier, Verdict};
pub use config::DmsConfig;
pub use gate::{FrameGate, FrameSubmit};
pub use geometry::{eye_aspect_ratio, extract_eyes, head_pose, Eyes, HeadPose};
pub use landmarks::{EyeLandmarks, FaceLandmark, LandmarkSet, Point2D, Point3D, REQUIRED_LANDMARKS};
pub use processor::FrameProcessor;
pub use session::{safety_score, MonitoringSession, ScoreBand, SessionAccumulator, SessionReport};
pub use state::{Condition, DetectionState};

use thiserror::Error;

/// DMS error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Landmark set too short: expected at least {expected} points, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },
}
