//! Detection event types for the session event log.
//!
//! Events are created once by the tracker and never mutated afterwards.
//! The log is append-only; insertion order is the order in which events
//! were detected, which is not necessarily the order their spans started.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wall-clock timestamp in milliseconds since the Unix epoch.
pub type TimestampMs = u64;

/// The kinds of integrity events the tracker can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Candidate looked away for longer than the focus threshold.
    FocusLost,
    /// No face in frame for longer than the absence threshold.
    FaceAbsent,
    /// More than one face in the current frame.
    MultipleFaces,
    /// A cell phone is visible.
    PhoneDetected,
    /// A book is visible.
    BookDetected,
    /// Another tracked device (laptop, tv, remote, keyboard) is visible.
    DeviceDetected,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 6] = [
        EventKind::FocusLost,
        EventKind::FaceAbsent,
        EventKind::MultipleFaces,
        EventKind::PhoneDetected,
        EventKind::BookDetected,
        EventKind::DeviceDetected,
    ];

    /// Wire name, as used in the JSON `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FocusLost => "focus_lost",
            EventKind::FaceAbsent => "face_absent",
            EventKind::MultipleFaces => "multiple_faces",
            EventKind::PhoneDetected => "phone_detected",
            EventKind::BookDetected => "book_detected",
            EventKind::DeviceDetected => "device_detected",
        }
    }

    /// Kinds raised when a span ends after exceeding a threshold.
    /// Only these carry a `duration`.
    pub fn is_span(&self) -> bool {
        matches!(self, EventKind::FocusLost | EventKind::FaceAbsent)
    }

    /// Kinds raised by the object detector. Only these carry a `confidence`.
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            EventKind::PhoneDetected | EventKind::BookDetected | EventKind::DeviceDetected
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable integrity event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// Unique identifier, monotonic within a monitoring run.
    pub id: String,

    /// What happened.
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Tick time at which the condition started.
    pub timestamp: TimestampMs,

    /// Span length in milliseconds (span kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    /// Classifier confidence in `[0, 1]` (object kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Human-readable summary.
    pub description: String,
}

impl DetectionEvent {
    /// Timestamp as fractional seconds relative to `origin`.
    pub fn offset_secs(&self, origin: TimestampMs) -> f64 {
        self.timestamp.saturating_sub(origin) as f64 / 1_000.0
    }
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<DetectionEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[DetectionEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn absent_event() -> DetectionEvent {
        DetectionEvent {
            id: "1700000000000-1".to_string(),
            kind: EventKind::FaceAbsent,
            timestamp: 1_700_000_000_000,
            duration: Some(12_000),
            confidence: None,
            description: "Face was absent for 12 seconds".to_string(),
        }
    }

    #[test]
    fn test_json_uses_type_field_and_omits_empty_options() {
        let json = serde_json::to_string(&absent_event()).unwrap();
        assert!(json.contains("\"type\":\"face_absent\""));
        assert!(json.contains("\"duration\":12000"));
        assert!(!json.contains("confidence"));
    }

    #[test]
    fn test_parse_events_skips_comments_and_blank_lines() {
        let jsonl = "# session log\n\n{\"id\":\"a\",\"type\":\"phone_detected\",\"timestamp\":5,\"confidence\":0.8,\"description\":\"cell phone detected with 80% confidence\"}\n";
        let parsed = parse_events(jsonl).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].kind, EventKind::PhoneDetected);
        assert_eq!(parsed[0].duration, None);
        assert_eq!(parsed[0].confidence, Some(0.8));
    }

    #[test]
    fn test_jsonl_preserves_insertion_order() {
        let mut later_span = absent_event();
        later_span.id = "b".to_string();
        later_span.timestamp = 10;
        let mut first = absent_event();
        first.id = "a".to_string();
        first.timestamp = 20;

        let jsonl = serialize_events(&[first.clone(), later_span.clone()]).unwrap();
        let parsed = parse_events(&jsonl).unwrap();
        assert_eq!(parsed, vec![first, later_span]);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let jsonl = "{\"id\":\"a\",\"type\":\"tab_switch\",\"timestamp\":5,\"description\":\"\"}";
        assert!(parse_events(jsonl).is_err());
    }

    #[test]
    fn test_kind_categories() {
        for kind in EventKind::ALL {
            assert!(!(kind.is_span() && kind.is_object()));
        }
        assert!(EventKind::FocusLost.is_span());
        assert!(EventKind::BookDetected.is_object());
        assert!(!EventKind::MultipleFaces.is_span());
        assert!(!EventKind::MultipleFaces.is_object());
        assert_eq!(EventKind::DeviceDetected.to_string(), "device_detected");
    }

    #[test]
    fn test_offset_secs() {
        let event = absent_event();
        assert!((event.offset_secs(1_699_999_998_500) - 1.5).abs() < 1e-9);
        assert_eq!(event.offset_secs(u64::MAX), 0.0);
    }
}
