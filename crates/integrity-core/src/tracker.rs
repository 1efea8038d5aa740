//! The detection-to-event state machine.
//!
//! # Algorithm
//!
//! Each tick the tracker receives one `ClassificationResult` and the tick
//! time, and returns the events that completed on that tick:
//!
//! 1. **Presence.** An absence span opens on the first faceless tick and
//!    closes on the next tick with a face. `face_absent` fires at close, and
//!    only if the span lasted strictly longer than the absence threshold.
//! 2. **Focus.** Same hysteresis with the focus threshold, evaluated only
//!    while a face is present. If the face disappears mid-span, the span
//!    closes on that tick.
//! 3. **Multiplicity.** `multiple_faces` fires on every tick with more than
//!    one face. There is no debouncing.
//! 4. **Objects.** Every tracked object above the confidence threshold fires
//!    on every tick it is visible. There is no debouncing.
//!
//! Span events are stamped with the tick the span started on.

use proctor_common::config::MonitoringDefaults;
use proctor_session_model::classification::{ClassificationResult, Face, ObjectLabel};
use proctor_session_model::event::{DetectionEvent, EventKind, TimestampMs};
use proctor_session_model::state::DetectionState;

use crate::emitter::EventEmitter;
use crate::focus::{is_focused_within, DEFAULT_FOCUS_DEVIATION_RATIO};

/// Thresholds for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Absence spans must exceed this to be reported (ms).
    pub absence_threshold_ms: u64,

    /// Focus-loss spans must exceed this to be reported (ms).
    pub focus_threshold_ms: u64,

    /// Eye-centre deviation ratio passed to the focus estimator.
    pub focus_deviation_ratio: f64,

    /// Objects must score strictly above this to raise an event.
    pub object_confidence_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            absence_threshold_ms: 10_000,
            focus_threshold_ms: 5_000,
            focus_deviation_ratio: DEFAULT_FOCUS_DEVIATION_RATIO,
            object_confidence_threshold: 0.5,
        }
    }
}

impl From<&MonitoringDefaults> for TrackerConfig {
    fn from(defaults: &MonitoringDefaults) -> Self {
        Self {
            absence_threshold_ms: defaults.absence_threshold_ms,
            focus_threshold_ms: defaults.focus_threshold_ms,
            focus_deviation_ratio: defaults.focus_deviation_ratio,
            object_confidence_threshold: defaults.object_confidence_threshold,
        }
    }
}

/// Mutable tracker state. Lives for one monitoring run and is never persisted.
///
/// `absent_start` is `Some` only while no face is present;
/// `focus_lost_start` is `Some` only while a face is present but unfocused.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    pub is_face_present: bool,
    pub is_focused: bool,
    pub face_count: usize,
    pub detected_objects: Vec<ObjectLabel>,
    pub last_face_time: TimestampMs,
    pub last_focus_time: TimestampMs,
    pub focus_lost_start: Option<TimestampMs>,
    pub absent_start: Option<TimestampMs>,
}

impl TrackerState {
    fn new(started_at: TimestampMs) -> Self {
        Self {
            is_face_present: false,
            is_focused: true,
            face_count: 0,
            detected_objects: Vec::new(),
            last_face_time: started_at,
            last_focus_time: started_at,
            focus_lost_start: None,
            absent_start: None,
        }
    }

    /// Display view of the state.
    pub fn snapshot(&self) -> DetectionState {
        DetectionState {
            is_face_present: self.is_face_present,
            is_focused: self.is_focused,
            face_count: self.face_count,
            detected_objects: self.detected_objects.clone(),
        }
    }
}

/// Event kind raised for a tracked object.
pub fn event_kind_for(label: ObjectLabel) -> EventKind {
    match label {
        ObjectLabel::CellPhone => EventKind::PhoneDetected,
        ObjectLabel::Book => EventKind::BookDetected,
        ObjectLabel::Laptop | ObjectLabel::Tv | ObjectLabel::Remote | ObjectLabel::Keyboard => {
            EventKind::DeviceDetected
        }
    }
}

/// Hysteresis tracker over presence and focus spans.
#[derive(Debug)]
pub struct StateTracker {
    config: TrackerConfig,
    state: TrackerState,
    emitter: EventEmitter,
}

impl StateTracker {
    /// Create a tracker for a run starting at `started_at`.
    pub fn new(config: TrackerConfig, started_at: TimestampMs) -> Self {
        Self {
            config,
            state: TrackerState::new(started_at),
            emitter: EventEmitter::new(),
        }
    }

    /// Create a tracker with default thresholds.
    pub fn with_defaults(started_at: TimestampMs) -> Self {
        Self::new(TrackerConfig::default(), started_at)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Display view of the current state.
    pub fn snapshot(&self) -> DetectionState {
        self.state.snapshot()
    }

    /// Apply one tick and return the events it completed, in emission order.
    ///
    /// A focus-loss span does not stay open across a lost face: it closes,
    /// and is reported if long enough, on the first faceless tick.
    pub fn update(
        &mut self,
        tick: &ClassificationResult,
        now: TimestampMs,
    ) -> Vec<DetectionEvent> {
        let mut events = Vec::new();
        let face_count = tick.face_count();
        let face_present = face_count > 0;

        self.track_presence(face_present, now, &mut events);
        self.track_focus(face_present, &tick.faces, now, &mut events);

        self.state.face_count = face_count;
        if face_count > 1 {
            events.push(self.emitter.multiple_faces(now, face_count));
        }

        for object in &tick.objects {
            if object.confidence > self.config.object_confidence_threshold {
                let kind = event_kind_for(object.label);
                events.push(self.emitter.object(kind, now, object.label, object.confidence));
            }
        }
        self.state.detected_objects = tick.object_labels();

        if !events.is_empty() {
            tracing::debug!(
                now,
                face_count,
                events = events.len(),
                "Tick produced integrity events"
            );
        }
        events
    }

    fn track_presence(
        &mut self,
        face_present: bool,
        now: TimestampMs,
        events: &mut Vec<DetectionEvent>,
    ) {
        self.state.is_face_present = face_present;

        if face_present {
            self.state.last_face_time = now;
            if let Some(started_at) = self.state.absent_start.take() {
                let elapsed = now.saturating_sub(started_at);
                if elapsed > self.config.absence_threshold_ms {
                    events.push(self.emitter.span(EventKind::FaceAbsent, started_at, elapsed));
                } else {
                    tracing::trace!(elapsed, "Absence span below threshold");
                }
            }
        } else if self.state.absent_start.is_none() {
            self.state.absent_start = Some(now);
        }
    }

    fn track_focus(
        &mut self,
        face_present: bool,
        faces: &[Face],
        now: TimestampMs,
        events: &mut Vec<DetectionEvent>,
    ) {
        let focused = face_present && is_focused_within(faces, self.config.focus_deviation_ratio);
        self.state.is_focused = focused;

        if focused {
            self.state.last_focus_time = now;
            self.close_focus_span(now, events);
        } else if face_present {
            if self.state.focus_lost_start.is_none() {
                self.state.focus_lost_start = Some(now);
            }
        } else {
            // Focus is undefined without a face.
            self.close_focus_span(now, events);
        }
    }

    fn close_focus_span(&mut self, now: TimestampMs, events: &mut Vec<DetectionEvent>) {
        let Some(started_at) = self.state.focus_lost_start.take() else {
            return;
        };
        let elapsed = now.saturating_sub(started_at);
        if elapsed > self.config.focus_threshold_ms {
            events.push(self.emitter.span(EventKind::FocusLost, started_at, elapsed));
        } else {
            tracing::trace!(elapsed, "Focus-loss span below threshold");
        }
    }
}
