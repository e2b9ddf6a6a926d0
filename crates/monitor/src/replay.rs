//! Replay of recorded face mesh output through a monitoring session.
//!
//! Recordings are JSON lines, one frame per line:
//! `{"timestamp_ms": 1200, "faces": [[{"x": 0.1, "y": 0.2, "z": 0.0}, ...]]}`.
//! Only the first face is used; an empty `faces` list means no face was found.

use std::io::BufRead;

use alerting::{AlertManager, AlertSink};
use dms::{
    FrameGate, FrameOutcome, FrameProcessor, FrameSubmit, LandmarkSet, MonitoringSession, Point3D,
    SessionReport,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::settings::MonitorConfig;
use crate::MonitorError;

const NANOS_PER_MS: u64 = 1_000_000;

/// One recorded tick of the face mesh model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub faces: Vec<Vec<Point3D>>,
}

impl FrameRecord {
    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp_ms.saturating_mul(NANOS_PER_MS)
    }

    /// Landmarks of the first face; a mesh too short to index is treated as no face
    pub fn first_face(&self) -> Option<LandmarkSet> {
        let points = self.faces.first()?;
        match LandmarkSet::new(points.clone()) {
            Ok(set) => Some(set),
            Err(e) => {
                warn!(timestamp_ms = self.timestamp_ms, "Discarding face: {}", e);
                None
            }
        }
    }
}

/// Parse a JSON-lines recording; blank lines are skipped
pub fn read_recording<R: BufRead>(reader: R) -> Result<Vec<FrameRecord>, MonitorError> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = serde_json::from_str(&line).map_err(|source| MonitorError::Parse {
            line: idx + 1,
            source,
        })?;
        frames.push(frame);
    }
    Ok(frames)
}

/// Outcome of a replayed session
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub report: SessionReport,
    pub frames: usize,
    pub frames_without_face: usize,
    pub dropped_frames: usize,
    pub alerts: usize,
}

/// Session driver over a recorded frame stream
pub struct Replay {
    gate: FrameGate,
    alerts: AlertManager,
}

impl Replay {
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        let processor = FrameProcessor::new(config.dms.clone())?;
        Ok(Self {
            gate: FrameGate::new(MonitoringSession::new(processor)),
            alerts: AlertManager::new(config.alert.clone()),
        })
    }

    /// Run one session from the first to the last frame's timestamp.
    ///
    /// `on_frame` sees every processed frame, in order.
    pub async fn run<S, F>(
        &mut self,
        frames: &[FrameRecord],
        mut sink: S,
        mut on_frame: F,
    ) -> Result<ReplaySummary, MonitorError>
    where
        S: AlertSink,
        F: FnMut(&FrameRecord, &FrameOutcome) -> Result<(), MonitorError>,
    {
        let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
            return Err(MonitorError::EmptyRecording);
        };

        self.alerts.clear();
        let session_id = self.gate.start(first.timestamp_ns()).await;
        info!(%session_id, frames = frames.len(), "Replaying recording");

        let mut processed = 0;
        let mut without_face = 0;
        let mut dropped = 0;
        let mut alerts = 0;

        for frame in frames {
            let face = frame.first_face();
            if face.is_none() {
                without_face += 1;
            }

            match self.gate.try_next_frame(face.as_ref(), frame.timestamp_ns()) {
                FrameSubmit::Processed(outcome) => {
                    processed += 1;
                    if outcome.alert {
                        if let Some(event) = self.alerts.on_frame(&outcome.state, frame.timestamp_ns()) {
                            sink.emit(&event);
                            alerts += 1;
                        }
                    }
                    on_frame(frame, &outcome)?;
                }
                FrameSubmit::Dropped => dropped += 1,
                FrameSubmit::Inactive => {
                    warn!("Session ended before the recording did");
                    break;
                }
            }
        }

        let report = self
            .gate
            .stop(last.timestamp_ns())
            .await
            .ok_or(MonitorError::EmptyRecording)?;

        Ok(ReplaySummary {
            report,
            frames: processed,
            frames_without_face: without_face,
            dropped_frames: dropped,
            alerts,
        })
    }
}
