//! Proctoring session: the candidate's append-only event log.
//!
//! The integrity score is never stored here; it is recomputed from
//! `events` whenever it is needed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::{DetectionEvent, EventKind, TimestampMs};

/// Error raised by session lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("candidate name must not be blank")]
    BlankCandidateName,

    #[error("session already finished at {0}")]
    AlreadyFinished(TimestampMs),

    #[error("end time {end} precedes start time {start}")]
    EndBeforeStart { start: TimestampMs, end: TimestampMs },
}

/// A single interview under observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProctoringSession {
    /// Trimmed candidate name.
    pub candidate_name: String,

    /// When monitoring started.
    pub start_time: TimestampMs,

    /// When monitoring stopped, once finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimestampMs>,

    /// Events in detection order.
    events: Vec<DetectionEvent>,
}

impl ProctoringSession {
    /// Open a session for `candidate_name` starting at `start_time`.
    pub fn new(candidate_name: &str, start_time: TimestampMs) -> Result<Self, SessionError> {
        let candidate_name = candidate_name.trim();
        if candidate_name.is_empty() {
            return Err(SessionError::BlankCandidateName);
        }
        Ok(Self {
            candidate_name: candidate_name.to_string(),
            start_time,
            end_time: None,
            events: Vec::new(),
        })
    }

    /// Append an event to the log.
    pub fn record(&mut self, event: DetectionEvent) {
        self.events.push(event);
    }

    /// The event log, in detection order.
    pub fn events(&self) -> &[DetectionEvent] {
        &self.events
    }

    /// Mark the session as finished.
    pub fn finish(&mut self, end_time: TimestampMs) -> Result<(), SessionError> {
        if let Some(existing) = self.end_time {
            return Err(SessionError::AlreadyFinished(existing));
        }
        if end_time < self.start_time {
            return Err(SessionError::EndBeforeStart {
                start: self.start_time,
                end: end_time,
            });
        }
        self.end_time = Some(end_time);
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// Session length, measured to `end_time` or to `now` while still running.
    pub fn duration_ms(&self, now: TimestampMs) -> u64 {
        self.end_time.unwrap_or(now).saturating_sub(self.start_time)
    }

    /// Number of events of each kind. Kinds that never occurred are absent.
    pub fn event_breakdown(&self) -> BTreeMap<EventKind, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Sum of reported focus-loss spans (ms).
    pub fn total_focus_lost_ms(&self) -> u64 {
        self.total_duration_of(EventKind::FocusLost)
    }

    /// Sum of reported absence spans (ms).
    pub fn total_absent_ms(&self) -> u64 {
        self.total_duration_of(EventKind::FaceAbsent)
    }

    fn total_duration_of(&self, kind: EventKind) -> u64 {
        self.events
            .iter()
            .filter(|event| event.kind == kind)
            .filter_map(|event| event.duration)
            .sum()
    }
}
