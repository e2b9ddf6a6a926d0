//! Per-frame alert decision

use serde::{Deserialize, Serialize};

use crate::state::DetectionState;

/// Whether an alert should be asserted this frame.
///
/// Fires on every frame while any unsafe condition holds. Debouncing is left
/// to the alert sink.
pub fn should_alert(state: &DetectionState) -> bool {
    state.is_drowsy || state.is_distracted || state.is_using_phone
}

/// Result of one processed frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameOutcome {
    pub state: DetectionState,
    pub alert: bool,
}

impl FrameOutcome {
    pub fn new(state: DetectionState) -> Self {
        Self {
            alert: should_alert(&state),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Verdict;
    use crate::geometry::HeadPose;

    #[test]
    fn test_alert_on_any_condition() {
        for verdict in [
            Verdict { drowsy: true, ..Default::default() },
            Verdict { distracted: true, ..Default::default() },
            Verdict { using_phone: true, ..Default::default() },
        ] {
            let state = DetectionState::detected(verdict, 0.3, HeadPose::default());
            assert!(should_alert(&state));
        }
    }

    #[test]
    fn test_no_alert_when_attentive() {
        let state = DetectionState::detected(Verdict::default(), 0.3, HeadPose::default());
        assert!(!should_alert(&state));
        assert!(!FrameOutcome::new(state).alert);
    }

    #[test]
    fn test_no_face_alerts() {
        assert!(FrameOutcome::new(DetectionState::no_face()).alert);
    }
}
