//! Single-writer access to a monitoring session from a frame source that may
//! outpace processing

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use crate::analysis::FrameOutcome;
use crate::landmarks::LandmarkSet;
use crate::session::{MonitoringSession, SessionReport};

/// What happened to a submitted frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameSubmit {
    /// Frame classified and accounted
    Processed(FrameOutcome),
    /// A previous frame still held the session; this one was skipped
    Dropped,
    /// No session running
    Inactive,
}

/// Cloneable handle to one session; at most one frame is processed at a time
#[derive(Debug, Clone)]
pub struct FrameGate {
    session: Arc<Mutex<MonitoringSession>>,
}

impl FrameGate {
    pub fn new(session: MonitoringSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub async fn start(&self, now_ns: u64) -> Uuid {
        self.session.lock().await.start(now_ns)
    }

    pub async fn stop(&self, now_ns: u64) -> Option<SessionReport> {
        self.session.lock().await.stop(now_ns)
    }

    /// Submit a frame without waiting; dropped if the session is busy
    pub fn try_next_frame(&self, landmarks: Option<&LandmarkSet>, now_ns: u64) -> FrameSubmit {
        let Ok(mut session) = self.session.try_lock() else {
            warn!(now_ns, "Session busy, dropping frame");
            return FrameSubmit::Dropped;
        };

        match session.next_frame(landmarks, now_ns) {
            Some(outcome) => FrameSubmit::Processed(outcome),
            None => FrameSubmit::Inactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: u64 = 1_000_000_000;

    #[tokio::test]
    async fn test_frames_before_start_are_inactive() {
        let gate = FrameGate::new(MonitoringSession::default());
        assert_eq!(gate.try_next_frame(None, 0), FrameSubmit::Inactive);
    }

    #[tokio::test]
    async fn test_busy_session_drops_frame() {
        let gate = FrameGate::new(MonitoringSession::default());
        gate.start(0).await;

        let guard = gate.session.lock().await;
        assert_eq!(gate.clone().try_next_frame(None, SECOND), FrameSubmit::Dropped);
        drop(guard);

        match gate.try_next_frame(None, SECOND) {
            FrameSubmit::Processed(outcome) => assert!(outcome.state.is_distracted),
            other => panic!("expected processed frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dropped_frame_leaves_durations_untouched() {
        let gate = FrameGate::new(MonitoringSession::default());
        gate.start(0).await;
        gate.try_next_frame(None, 0);

        {
            let _guard = gate.session.lock().await;
            assert_eq!(gate.try_next_frame(None, 5 * SECOND), FrameSubmit::Dropped);
        }

        let report = gate.stop(10 * SECOND).await.unwrap();
        assert_eq!(report.distracted_duration, 0.0);
    }

    #[tokio::test]
    async fn test_clones_share_session() {
        let gate = FrameGate::new(MonitoringSession::default());
        let other = gate.clone();
        gate.start(0).await;
        other.try_next_frame(None, 0);
        other.try_next_frame(None, 2 * SECOND);

        let report = gate.stop(4 * SECOND).await.unwrap();
        assert!((report.distracted_duration - 2.0).abs() < 1e-9);
        assert_eq!(report.safety_score, 0);
    }
}
