//! Detection event construction.

use proctor_session_model::classification::ObjectLabel;
use proctor_session_model::event::{DetectionEvent, EventKind, TimestampMs};

/// Builds `DetectionEvent` records with unique, monotonic ids.
///
/// Ids have the form `<timestamp>-<sequence>`; the sequence is strictly
/// increasing for the lifetime of the emitter, so two events raised in the
/// same millisecond still get distinct ids. The emitter never deduplicates
/// or drops anything.
#[derive(Debug, Default)]
pub struct EventEmitter {
    next_sequence: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an event with a freshly generated id.
    pub fn emit(
        &mut self,
        kind: EventKind,
        timestamp: TimestampMs,
        duration: Option<u64>,
        confidence: Option<f64>,
        description: String,
    ) -> DetectionEvent {
        debug_assert!(duration.is_none() || kind.is_span());
        debug_assert!(confidence.is_none() || kind.is_object());
        self.next_sequence += 1;
        DetectionEvent {
            id: format!("{timestamp}-{}", self.next_sequence),
            kind,
            timestamp,
            duration,
            confidence,
            description,
        }
    }

    /// A span that exceeded its threshold (`face_absent` / `focus_lost`).
    pub fn span(
        &mut self,
        kind: EventKind,
        started_at: TimestampMs,
        elapsed_ms: u64,
    ) -> DetectionEvent {
        let secs = round_div(elapsed_ms, 1_000);
        let description = match kind {
            EventKind::FaceAbsent => format!("Face was absent for {secs} seconds"),
            EventKind::FocusLost => format!("Lost focus for {secs} seconds"),
            other => format!("{other} lasted {secs} seconds"),
        };
        self.emit(kind, started_at, Some(elapsed_ms), None, description)
    }

    /// More than one face in frame.
    pub fn multiple_faces(&mut self, now: TimestampMs, face_count: usize) -> DetectionEvent {
        self.emit(
            EventKind::MultipleFaces,
            now,
            None,
            None,
            format!("{face_count} faces detected in frame"),
        )
    }

    /// A tracked object seen with enough confidence.
    pub fn object(
        &mut self,
        kind: EventKind,
        now: TimestampMs,
        label: ObjectLabel,
        confidence: f64,
    ) -> DetectionEvent {
        let percent = (confidence * 100.0).round() as u32;
        self.emit(
            kind,
            now,
            None,
            Some(confidence),
            format!("{label} detected with {percent}% confidence"),
        )
    }
}

/// Integer division rounding half up.
fn round_div(value: u64, divisor: u64) -> u64 {
    (value + divisor / 2) / divisor
}
