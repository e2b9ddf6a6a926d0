//! Alert sinks

use tracing::warn;

use crate::manager::AlertEvent;

/// Destination for alert events (speaker, UI, log)
pub trait AlertSink {
    fn emit(&mut self, event: &AlertEvent);
}

/// Logs every alert at warn level
#[derive(Debug, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn emit(&mut self, event: &AlertEvent) {
        let conditions: Vec<&str> = event.conditions.iter().map(|c| c.as_str()).collect();
        warn!(
            timestamp_ns = event.timestamp_ns,
            frequency_hz = event.tone.frequency_hz,
            "Driver alert: {}",
            conditions.join(", ")
        );
    }
}

/// Keeps every alert in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<AlertEvent>,
}

impl RecordingSink {
    pub fn events(&self) -> &[AlertEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl AlertSink for RecordingSink {
    fn emit(&mut self, event: &AlertEvent) {
        self.events.push(event.clone());
    }
}

impl<S: AlertSink + ?Sized> AlertSink for &mut S {
    fn emit(&mut self, event: &AlertEvent) {
        (**self).emit(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::AlertManager;
    use dms::DetectionState;

    #[test]
    fn test_recording_sink_collects_events() {
        let mut manager = AlertManager::default();
        let mut sink = RecordingSink::default();

        for t in 0..3 {
            if let Some(event) = manager.on_frame(&DetectionState::no_face(), t) {
                sink.emit(&event);
            }
        }

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.events()[2].timestamp_ns, 2);
    }

    #[test]
    fn test_sink_by_mutable_reference() {
        fn emit_into(mut sink: impl AlertSink, event: &AlertEvent) {
            sink.emit(event);
        }

        let mut sink = RecordingSink::default();
        let event = AlertManager::default()
            .on_frame(&DetectionState::no_face(), 0)
            .unwrap();
        emit_into(&mut sink, &event);
        assert!(!sink.is_empty());
    }
}
