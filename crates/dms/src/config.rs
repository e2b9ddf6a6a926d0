//! DMS configuration

use serde::{Deserialize, Serialize};

use crate::DmsError;

/// Classifier thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// Eye aspect ratio below which the driver counts as drowsy
    pub drowsy_ear_threshold: f64,

    /// Yaw proxy (degrees) below which the driver counts as distracted
    pub distraction_yaw_threshold: f64,

    /// Pitch proxy (degrees) below which the driver counts as using a phone
    pub phone_pitch_threshold: f64,

    /// Accepted for compatibility; phone use is decided on pitch alone
    pub phone_yaw_threshold: f64,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            drowsy_ear_threshold: 0.2,
            distraction_yaw_threshold: 150.0,
            phone_pitch_threshold: 42.0,
            phone_yaw_threshold: 150.0,
        }
    }
}

impl DmsConfig {
    /// Reject negative or non-finite thresholds
    pub fn validate(&self) -> Result<(), DmsError> {
        let fields = [
            ("drowsy_ear_threshold", self.drowsy_ear_threshold),
            ("distraction_yaw_threshold", self.distraction_yaw_threshold),
            ("phone_pitch_threshold", self.phone_pitch_threshold),
            ("phone_yaw_threshold", self.phone_yaw_threshold),
        ];

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(DmsError::Config(format!("{field} must be finite, got {value}")));
            }
            if value < 0.0 {
                return Err(DmsError::Config(format!("{field} must not be negative, got {value}")));
            }
        }

        Ok(())
    }
}
