//! Live display state and event delivery.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::classification::ObjectLabel;
use crate::event::DetectionEvent;
use crate::session::ProctoringSession;

/// Snapshot of what the monitor currently sees, for live display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionState {
    pub is_face_present: bool,
    pub is_focused: bool,
    pub face_count: usize,
    pub detected_objects: Vec<ObjectLabel>,
}

impl Default for DetectionState {
    /// Nothing observed yet: no face, but not flagged as unfocused either.
    fn default() -> Self {
        Self {
            is_face_present: false,
            is_focused: true,
            face_count: 0,
            detected_objects: Vec::new(),
        }
    }
}

/// Receives events as the monitor produces them.
///
/// Sinks must not drop or reorder events; the session log built from them
/// is append-only.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: DetectionEvent);
}

impl<F> EventSink for F
where
    F: Fn(DetectionEvent) + Send + Sync,
{
    fn deliver(&self, event: DetectionEvent) {
        self(event)
    }
}

impl EventSink for Mutex<ProctoringSession> {
    fn deliver(&self, event: DetectionEvent) {
        let mut session = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        session.record(event);
    }
}

impl EventSink for Mutex<Vec<DetectionEvent>> {
    fn deliver(&self, event: DetectionEvent) {
        let mut log = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        log.push(event);
    }
}
