//! Session accounting: per-condition durations, lifecycle, and the final report

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::FrameOutcome;
use crate::landmarks::LandmarkSet;
use crate::processor::FrameProcessor;
use crate::state::DetectionState;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Unsafe fraction of the session that floors the score at zero is 10%
const UNSAFE_PENALTY: f64 = 1000.0;

fn secs_between(earlier_ns: u64, later_ns: u64) -> f64 {
    later_ns.saturating_sub(earlier_ns) as f64 / NANOS_PER_SEC
}

/// Score 0-100: `round(100 - unsafe / total * 1000)`, clamped.
///
/// A zero-length session scores 100.
pub fn safety_score(total_secs: f64, unsafe_secs: f64) -> u8 {
    if total_secs <= 0.0 {
        return 100;
    }
    let score = 100.0 - (unsafe_secs / total_secs) * UNSAFE_PENALTY;
    score.round().clamp(0.0, 100.0) as u8
}

/// Coarse rating of a safety score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    /// 90 and above
    Good,
    /// 70 to 89
    Fair,
    /// Below 70
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => ScoreBand::Good,
            70..=89 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

/// Cumulative unsafe durations of one session (single writer)
#[derive(Debug, Clone)]
pub struct SessionAccumulator {
    session_start_ns: u64,
    last_frame_ns: Option<u64>,
    drowsy_secs: f64,
    distracted_secs: f64,
    phone_usage_secs: f64,
}

impl SessionAccumulator {
    /// Fresh accumulator with all durations at zero
    pub fn start(now_ns: u64) -> Self {
        Self {
            session_start_ns: now_ns,
            last_frame_ns: None,
            drowsy_secs: 0.0,
            distracted_secs: 0.0,
            phone_usage_secs: 0.0,
        }
    }

    /// Add the time since the previous frame to every asserted condition.
    ///
    /// The first frame only sets the clock. Timestamps that go backwards add
    /// nothing and never move the clock back; unreliable frames add nothing.
    pub fn record_frame(&mut self, state: &DetectionState, now_ns: u64) {
        let now_ns = now_ns.max(self.session_start_ns);

        if let Some(last) = self.last_frame_ns {
            let delta = secs_between(last, now_ns);
            if state.reliable {
                if state.is_drowsy {
                    self.drowsy_secs += delta;
                }
                if state.is_distracted {
                    self.distracted_secs += delta;
                }
                if state.is_using_phone {
                    self.phone_usage_secs += delta;
                }
            }
        }

        self.last_frame_ns = Some(self.last_frame_ns.map_or(now_ns, |last| last.max(now_ns)));
    }

    pub fn session_start_ns(&self) -> u64 {
        self.session_start_ns
    }

    pub fn last_frame_ns(&self) -> Option<u64> {
        self.last_frame_ns
    }

    pub fn drowsy_secs(&self) -> f64 {
        self.drowsy_secs
    }

    pub fn distracted_secs(&self) -> f64 {
        self.distracted_secs
    }

    pub fn phone_usage_secs(&self) -> f64 {
        self.phone_usage_secs
    }

    /// Close the session; the accumulator is consumed.
    ///
    /// The session ends no earlier than the latest frame already recorded, so
    /// no duration exceeds the total.
    pub fn finish(self, now_ns: u64, session_id: Uuid) -> SessionReport {
        let end_ns = now_ns
            .max(self.last_frame_ns.unwrap_or(now_ns))
            .max(self.session_start_ns);

        SessionReport::new(
            session_id,
            secs_between(self.session_start_ns, end_ns),
            self.drowsy_secs,
            self.distracted_secs,
            self.phone_usage_secs,
        )
    }
}

/// Immutable summary of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub total_duration: f64,
    pub drowsy_duration: f64,
    pub distracted_duration: f64,
    pub phone_usage_duration: f64,
    pub safety_score: u8,
    pub score_band: ScoreBand,
}

impl SessionReport {
    /// Build a report, deriving the score from the durations (seconds)
    pub fn new(
        session_id: Uuid,
        total_duration: f64,
        drowsy_duration: f64,
        distracted_duration: f64,
        phone_usage_duration: f64,
    ) -> Self {
        let unsafe_time = drowsy_duration + distracted_duration + phone_usage_duration;
        let safety_score = safety_score(total_duration, unsafe_time);
        Self {
            session_id,
            total_duration,
            drowsy_duration,
            distracted_duration,
            phone_usage_duration,
            safety_score,
            score_band: ScoreBand::from_score(safety_score),
        }
    }

    /// Sum of all per-condition durations
    pub fn unsafe_duration(&self) -> f64 {
        self.drowsy_duration + self.distracted_duration + self.phone_usage_duration
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Driver Safety Report")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "Total Session Time: {:.1}s", self.total_duration)?;
        writeln!(f)?;
        writeln!(f, "Time Distracted: {:.1}s", self.distracted_duration)?;
        writeln!(f, "Time Drowsy: {:.1}s", self.drowsy_duration)?;
        writeln!(f, "Time Using Phone: {:.1}s", self.phone_usage_duration)?;
        write!(f, "Safety Score: {} ({:?})", self.safety_score, self.score_band)
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Active {
        session_id: Uuid,
        accumulator: SessionAccumulator,
    },
    Stopped(SessionReport),
}

/// Start/frame/stop lifecycle around one accumulator at a time
#[derive(Debug)]
pub struct MonitoringSession {
    processor: FrameProcessor,
    phase: Phase,
}

impl MonitoringSession {
    pub fn new(processor: FrameProcessor) -> Self {
        Self {
            processor,
            phase: Phase::Idle,
        }
    }

    /// Begin a session, discarding any previous accumulator or report
    pub fn start(&mut self, now_ns: u64) -> Uuid {
        let session_id = Uuid::new_v4();
        info!(%session_id, "Monitoring session started");
        self.phase = Phase::Active {
            session_id,
            accumulator: SessionAccumulator::start(now_ns),
        };
        session_id
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    /// Accumulator of the running session
    pub fn accumulator(&self) -> Option<&SessionAccumulator> {
        match &self.phase {
            Phase::Active { accumulator, .. } => Some(accumulator),
            _ => None,
        }
    }

    /// Process one frame; `None` when no session is running
    pub fn next_frame(&mut self, landmarks: Option<&LandmarkSet>, now_ns: u64) -> Option<FrameOutcome> {
        match &mut self.phase {
            Phase::Active { accumulator, .. } => {
                let state = self.processor.process(landmarks, now_ns, accumulator);
                Some(FrameOutcome::new(state))
            }
            _ => {
                debug!("Frame ignored, no active session");
                None
            }
        }
    }

    /// End the session and produce its report.
    ///
    /// Stopping again returns the same report; stopping before any start
    /// returns `None`.
    pub fn stop(&mut self, now_ns: u64) -> Option<SessionReport> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Active {
                session_id,
                accumulator,
            } => {
                let report = accumulator.finish(now_ns, session_id);
                info!(
                    %session_id,
                    total = report.total_duration,
                    score = report.safety_score,
                    "Monitoring session stopped"
                );
                self.phase = Phase::Stopped(report.clone());
                Some(report)
            }
            Phase::Stopped(report) => {
                self.phase = Phase::Stopped(report.clone());
                Some(report)
            }
            Phase::Idle => None,
        }
    }
}

impl Default for MonitoringSession {
    fn default() -> Self {
        Self::new(FrameProcessor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Verdict;
    use crate::geometry::HeadPose;

    const SECOND: u64 = 1_000_000_000;

    fn drowsy() -> DetectionState {
        DetectionState::detected(
            Verdict {
                drowsy: true,
                ..Default::default()
            },
            0.1,
            HeadPose::default(),
        )
    }

    #[test]
    fn test_score_boundaries() {
        assert_eq!(safety_score(100.0, 0.0), 100);
        assert_eq!(safety_score(60.0, 6.0), 0);
        assert_eq!(safety_score(100.0, 10.0), 0);
        assert_eq!(safety_score(100.0, 5.0), 50);
        assert_eq!(safety_score(100.0, 80.0), 0);
        assert_eq!(safety_score(0.0, 0.0), 100);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(90), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(89), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(70), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(69), ScoreBand::Poor);
    }

    #[test]
    fn test_clock_going_backwards_adds_nothing() {
        let mut acc = SessionAccumulator::start(0);
        acc.record_frame(&drowsy(), 10 * SECOND);
        acc.record_frame(&drowsy(), 5 * SECOND);
        assert_eq!(acc.drowsy_secs(), 0.0);
        assert_eq!(acc.last_frame_ns(), Some(10 * SECOND));

        acc.record_frame(&drowsy(), 11 * SECOND);
        assert!((acc.drowsy_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_conditions_accumulate_independently() {
        let state = DetectionState::detected(
            Verdict {
                drowsy: true,
                distracted: true,
                using_phone: true,
            },
            0.1,
            HeadPose::default(),
        );
        let mut acc = SessionAccumulator::start(0);
        acc.record_frame(&state, 0);
        acc.record_frame(&state, 2 * SECOND);
        assert!((acc.drowsy_secs() - 2.0).abs() < 1e-9);
        assert!((acc.distracted_secs() - 2.0).abs() < 1e-9);
        assert!((acc.phone_usage_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut session = MonitoringSession::default();
        session.start(0);
        session.next_frame(None, 0);
        session.next_frame(None, SECOND);

        let first = session.stop(10 * SECOND).unwrap();
        let second = session.stop(20 * SECOND).unwrap();
        assert_eq!(first, second);
        assert!((first.total_duration - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_stop_before_last_frame_extends_total() {
        let mut session = MonitoringSession::default();
        session.start(0);
        session.next_frame(None, 0);
        session.next_frame(None, 10 * SECOND);

        let report = session.stop(5 * SECOND).unwrap();
        assert!((report.total_duration - 10.0).abs() < 1e-9);
        assert!(report.distracted_duration <= report.total_duration);
        assert_eq!(report.safety_score, 0);
    }

    #[test]
    fn test_stop_before_session_start_keeps_unsafe_time() {
        let mut session = MonitoringSession::default();
        session.start(10 * SECOND);
        session.next_frame(None, 10 * SECOND);
        session.next_frame(None, 20 * SECOND);

        let report = session.stop(5 * SECOND).unwrap();
        assert!((report.total_duration - 10.0).abs() < 1e-9);
        assert!((report.distracted_duration - 10.0).abs() < 1e-9);
        assert!(report.safety_score < 100);
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut session = MonitoringSession::default();
        assert!(session.stop(SECOND).is_none());
        assert!(session.next_frame(None, SECOND).is_none());
    }

    #[test]
    fn test_restart_discards_previous_durations() {
        let mut session = MonitoringSession::default();
        session.start(0);
        session.next_frame(None, 0);
        session.next_frame(None, 5 * SECOND);
        session.stop(5 * SECOND);

        session.start(10 * SECOND);
        assert_eq!(session.accumulator().unwrap().distracted_secs(), 0.0);
        let report = session.stop(10 * SECOND).unwrap();
        assert_eq!(report.safety_score, 100);
    }

    #[test]
    fn test_report_text() {
        let report = SessionReport::new(Uuid::nil(), 60.0, 3.0, 2.0, 1.0);
        let text = report.to_string();
        assert!(text.starts_with("Driver Safety Report"));
        assert!(text.contains("Total Session Time: 60.0s"));
        assert!(text.contains("Time Distracted: 2.0s"));
        assert!(text.contains("Time Drowsy: 3.0s"));
        assert!(text.contains("Time Using Phone: 1.0s"));
        assert!(text.contains("Safety Score: 0 (Poor)"));
    }
}
