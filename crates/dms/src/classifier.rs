//! Threshold classifiers over geometric features

use crate::config::DmsConfig;

/// Eyes closing: EAR below threshold
pub fn is_drowsy(ear: f64, threshold: f64) -> bool {
    ear < threshold
}

/// One-sided test on the yaw proxy
pub fn is_distracted(yaw: f64, threshold: f64) -> bool {
    yaw < threshold
}

/// Head tilted down towards a phone.
///
/// `yaw` and `yaw_threshold` are part of the signature but do not take part in
/// the decision.
pub fn is_using_phone(pitch: f64, _yaw: f64, pitch_threshold: f64, _yaw_threshold: f64) -> bool {
    pitch < pitch_threshold
}

/// Classifier verdicts for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verdict {
    pub drowsy: bool,
    pub distracted: bool,
    pub using_phone: bool,
}

/// The three classifiers bound to a validated configuration
#[derive(Debug, Clone)]
pub struct Classifier {
    config: DmsConfig,
}

impl Classifier {
    /// Thresholds must already be validated
    pub(crate) fn new(config: DmsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    pub fn classify(&self, ear: f64, yaw: f64, pitch: f64) -> Verdict {
        Verdict {
            drowsy: is_drowsy(ear, self.config.drowsy_ear_threshold),
            distracted: is_distracted(yaw, self.config.distraction_yaw_threshold),
            using_phone: is_using_phone(
                pitch,
                yaw,
                self.config.phone_pitch_threshold,
                self.config.phone_yaw_threshold,
            ),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DmsConfig::default())
    }
}
