//! Per-frame driver state

use serde::{Deserialize, Serialize};

use crate::classifier::Verdict;
use crate::geometry::HeadPose;

/// Unsafe driver condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    Drowsy,
    Distracted,
    PhoneUse,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Drowsy, Condition::Distracted, Condition::PhoneUse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Drowsy => "drowsy",
            Condition::Distracted => "distracted",
            Condition::PhoneUse => "phone_use",
        }
    }
}

/// Classification result for exactly one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionState {
    pub is_drowsy: bool,
    pub is_distracted: bool,
    pub is_using_phone: bool,
    /// Mean EAR of both eyes (0 when no face)
    pub eye_aspect_ratio: f64,
    pub head_pose: HeadPose,
    /// Whether a face was visible this frame
    pub face_detected: bool,
    /// False when degenerate geometry suppressed classification
    pub reliable: bool,
}

impl DetectionState {
    /// Classified frame with real features
    pub fn detected(verdict: Verdict, eye_aspect_ratio: f64, head_pose: HeadPose) -> Self {
        Self {
            is_drowsy: verdict.drowsy,
            is_distracted: verdict.distracted,
            is_using_phone: verdict.using_phone,
            eye_aspect_ratio,
            head_pose,
            face_detected: true,
            reliable: true,
        }
    }

    /// No face visible: assume the driver is distracted
    pub fn no_face() -> Self {
        Self {
            is_distracted: true,
            reliable: true,
            ..Default::default()
        }
    }

    /// Face visible but features non-finite; nothing is asserted
    pub fn unreliable() -> Self {
        Self {
            face_detected: true,
            reliable: false,
            ..Default::default()
        }
    }

    pub fn has(&self, condition: Condition) -> bool {
        match condition {
            Condition::Drowsy => self.is_drowsy,
            Condition::Distracted => self.is_distracted,
            Condition::PhoneUse => self.is_using_phone,
        }
    }

    /// Conditions asserted this frame
    pub fn active_conditions(&self) -> Vec<Condition> {
        Condition::ALL.into_iter().filter(|c| self.has(*c)).collect()
    }

    pub fn is_unsafe(&self) -> bool {
        self.is_drowsy || self.is_distracted || self.is_using_phone
    }
}
