//! Geometric features derived from face mesh landmarks

use serde::{Deserialize, Serialize};

use crate::landmarks::{EyeLandmarks, FaceLandmark, LandmarkSet};

/// Head pose proxy angles.
///
/// These are not calibrated Euler angles. Their scale comes straight from the
/// atan2 formulation in [`head_pose`] and the classifier thresholds are tuned
/// against it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    /// Yaw (left-right rotation) in degrees
    pub yaw: f64,
    /// Pitch (up-down tilt) in degrees
    pub pitch: f64,
}

impl HeadPose {
    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite()
    }
}

/// Both eye contours of a face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Eyes {
    pub left: EyeLandmarks,
    pub right: EyeLandmarks,
}

/// Eye aspect ratio: `(|p1-p5| + |p2-p4|) / (2 * |p0-p3|)`.
///
/// A zero horizontal distance yields a non-finite result; callers treat that
/// as "no reliable reading".
pub fn eye_aspect_ratio(eye: &EyeLandmarks) -> f64 {
    let p = eye.points();
    let vertical1 = p[1].distance(&p[5]);
    let vertical2 = p[2].distance(&p[4]);
    let horizontal = p[0].distance(&p[3]);
    (vertical1 + vertical2) / (2.0 * horizontal)
}

/// Mean EAR of both eyes
pub fn average_eye_aspect_ratio(eyes: &Eyes) -> f64 {
    (eye_aspect_ratio(&eyes.left) + eye_aspect_ratio(&eyes.right)) / 2.0
}

/// Head pose from nose tip, outer eye corners, and chin.
///
/// yaw = atan2(nose.x - mid.x, nose.z - mid.z), pitch = atan2(chin.y - nose.y,
/// chin.z - nose.z), both in degrees, where `mid` is the midpoint of the eye
/// corners.
pub fn head_pose(landmarks: &LandmarkSet) -> HeadPose {
    let nose = landmarks.get(FaceLandmark::NoseTip);
    let left_eye = landmarks.get(FaceLandmark::LeftEyeOuter);
    let right_eye = landmarks.get(FaceLandmark::RightEyeOuter);
    let chin = landmarks.get(FaceLandmark::Chin);

    let eye_center = left_eye.midpoint(&right_eye);

    let yaw = (nose.x - eye_center.x).atan2(nose.z - eye_center.z).to_degrees();
    let pitch = (chin.y - nose.y).atan2(chin.z - nose.z).to_degrees();

    HeadPose { yaw, pitch }
}

/// Pick both eye contours out of the mesh
pub fn extract_eyes(landmarks: &LandmarkSet) -> Eyes {
    let contour = |table: &[FaceLandmark; 6]| {
        EyeLandmarks((*table).map(|lm| landmarks.get(lm).to_2d()))
    };

    Eyes {
        left: contour(&FaceLandmark::LEFT_EYE),
        right: contour(&FaceLandmark::RIGHT_EYE),
    }
}
