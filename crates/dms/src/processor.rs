//! Per-frame orchestration: landmarks -> features -> classifiers -> accumulator

use tracing::{debug, warn};

use crate::classifier::Classifier;
use crate::config::DmsConfig;
use crate::geometry::{average_eye_aspect_ratio, extract_eyes, head_pose};
use crate::landmarks::LandmarkSet;
use crate::session::SessionAccumulator;
use crate::state::DetectionState;
use crate::DmsError;

/// Stateless frame step bound to a validated configuration
#[derive(Debug, Clone, Default)]
pub struct FrameProcessor {
    classifier: Classifier,
}

impl FrameProcessor {
    /// Validate thresholds once; classification never re-checks them
    pub fn new(config: DmsConfig) -> Result<Self, DmsError> {
        config.validate()?;
        Ok(Self {
            classifier: Classifier::new(config),
        })
    }

    pub fn config(&self) -> &DmsConfig {
        self.classifier.config()
    }

    /// Classify one frame without touching any session state
    pub fn classify(&self, landmarks: Option<&LandmarkSet>) -> DetectionState {
        let Some(landmarks) = landmarks else {
            return DetectionState::no_face();
        };

        let eyes = extract_eyes(landmarks);
        let ear = average_eye_aspect_ratio(&eyes);
        let pose = head_pose(landmarks);

        if !ear.is_finite() || !pose.is_finite() {
            warn!(ear, yaw = pose.yaw, pitch = pose.pitch, "Degenerate landmark geometry, skipping classification");
            return DetectionState::unreliable();
        }

        let verdict = self.classifier.classify(ear, pose.yaw, pose.pitch);
        DetectionState::detected(verdict, ear, pose)
    }

    /// Classify one frame and fold it into the session durations
    pub fn process(
        &self,
        landmarks: Option<&LandmarkSet>,
        now_ns: u64,
        accumulator: &mut SessionAccumulator,
    ) -> DetectionState {
        let state = self.classify(landmarks);
        accumulator.record_frame(&state, now_ns);

        debug!(
            face = state.face_detected,
            drowsy = state.is_drowsy,
            distracted = state.is_distracted,
            phone = state.is_using_phone,
            ear = state.eye_aspect_ratio,
            "Frame processed"
        );

        state
    }
}
