//! Integrity scoring.
//!
//! The score starts at 100 and loses points per event:
//!
//! | kind             | penalty                     |
//! |------------------|-----------------------------|
//! | `focus_lost`     | min(10, duration_ms / 1000) |
//! | `face_absent`    | min(15, duration_ms / 2000) |
//! | `multiple_faces` | 5                           |
//! | `phone_detected` | 20                          |
//! | `book_detected`  | 15                          |
//! | `device_detected`| 10                          |
//!
//! Penalties are summed exactly in fixed-point units of 1/2000 point, so
//! the result does not depend on event order. Rounding happens once, on
//! the final total.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use proctor_session_model::event::{DetectionEvent, EventKind, TimestampMs};
use proctor_session_model::session::ProctoringSession;

/// Fixed-point units per score point.
const UNITS_PER_POINT: u64 = 2_000;

const MAX_SCORE: u8 = 100;

/// Penalty for one event, in fixed-point units.
fn penalty_units(event: &DetectionEvent) -> u64 {
    let duration = event.duration.unwrap_or(0);
    match event.kind {
        // 1 point per second, capped at 10
        EventKind::FocusLost => duration.saturating_mul(2).min(10 * UNITS_PER_POINT),
        // 1 point per 2 seconds, capped at 15
        EventKind::FaceAbsent => duration.min(15 * UNITS_PER_POINT),
        EventKind::MultipleFaces => 5 * UNITS_PER_POINT,
        EventKind::PhoneDetected => 20 * UNITS_PER_POINT,
        EventKind::BookDetected => 15 * UNITS_PER_POINT,
        EventKind::DeviceDetected => 10 * UNITS_PER_POINT,
    }
}

/// Points deducted for a single event.
pub fn penalty(event: &DetectionEvent) -> f64 {
    penalty_units(event) as f64 / UNITS_PER_POINT as f64
}

/// Integrity score in `[0, 100]` for an event log. Pure and order-independent.
pub fn compute_integrity_score(events: &[DetectionEvent]) -> u8 {
    let deducted = events
        .iter()
        .map(penalty_units)
        .fold(0u64, u64::saturating_add);
    let remaining = (MAX_SCORE as u64 * UNITS_PER_POINT).saturating_sub(deducted);
    // Round half up.
    ((remaining + UNITS_PER_POINT / 2) / UNITS_PER_POINT) as u8
}

/// Qualitative band for an integrity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl IntegrityGrade {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => IntegrityGrade::Excellent,
            60..=79 => IntegrityGrade::Good,
            40..=59 => IntegrityGrade::Fair,
            _ => IntegrityGrade::Poor,
        }
    }
}

impl fmt::Display for IntegrityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IntegrityGrade::Excellent => "Excellent",
            IntegrityGrade::Good => "Good",
            IntegrityGrade::Fair => "Fair",
            IntegrityGrade::Poor => "Poor",
        };
        f.write_str(label)
    }
}

/// Derived statistics for a session, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub candidate_name: String,
    pub start_time: TimestampMs,
    pub end_time: Option<TimestampMs>,
    pub duration_ms: u64,
    pub integrity_score: u8,
    pub grade: IntegrityGrade,
    pub total_events: usize,
    pub total_focus_lost_ms: u64,
    pub total_absent_ms: u64,
    pub event_breakdown: BTreeMap<EventKind, usize>,
}

impl SessionSummary {
    /// Summarize `session`; `now` bounds the duration of a running session.
    pub fn from_session(session: &ProctoringSession, now: TimestampMs) -> Self {
        let integrity_score = compute_integrity_score(session.events());
        Self {
            candidate_name: session.candidate_name.clone(),
            start_time: session.start_time,
            end_time: session.end_time,
            duration_ms: session.duration_ms(now),
            integrity_score,
            grade: IntegrityGrade::from_score(integrity_score),
            total_events: session.events().len(),
            total_focus_lost_ms: session.total_focus_lost_ms(),
            total_absent_ms: session.total_absent_ms(),
            event_breakdown: session.event_breakdown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, duration: Option<u64>) -> DetectionEvent {
        DetectionEvent {
            id: String::new(),
            kind,
            timestamp: 0,
            duration,
            confidence: None,
            description: String::new(),
        }
    }

    #[test]
    fn test_empty_log_scores_100() {
        assert_eq!(compute_integrity_score(&[]), 100);
    }

    #[test]
    fn test_twelve_second_absence_costs_six() {
        let events = [event(EventKind::FaceAbsent, Some(12_000))];
        assert_eq!(penalty(&events[0]), 6.0);
        assert_eq!(compute_integrity_score(&events), 94);
    }

    #[test]
    fn test_span_penalties_are_capped() {
        assert_eq!(penalty(&event(EventKind::FocusLost, Some(60_000))), 10.0);
        assert_eq!(penalty(&event(EventKind::FaceAbsent, Some(600_000))), 15.0);
        assert_eq!(penalty(&event(EventKind::FocusLost, None)), 0.0);
        assert_eq!(penalty(&event(EventKind::FocusLost, Some(u64::MAX))), 10.0);
    }

    #[test]
    fn test_flat_penalties() {
        assert_eq!(penalty(&event(EventKind::MultipleFaces, None)), 5.0);
        assert_eq!(penalty(&event(EventKind::PhoneDetected, None)), 20.0);
        assert_eq!(penalty(&event(EventKind::BookDetected, None)), 15.0);
        assert_eq!(penalty(&event(EventKind::DeviceDetected, None)), 10.0);
    }

    #[test]
    fn test_three_multiple_face_ticks_cost_fifteen() {
        let events = vec![event(EventKind::MultipleFaces, None); 3];
        assert_eq!(compute_integrity_score(&events), 85);
    }

    #[test]
    fn test_rounding_only_on_total() {
        // 5.5 + 5.5 = 11 -> 89, not round(5.5) + round(5.5) = 12
        let events = [
            event(EventKind::FocusLost, Some(5_500)),
            event(EventKind::FocusLost, Some(5_500)),
        ];
        assert_eq!(compute_integrity_score(&events), 89);

        // 100 - 6.5 = 93.5 rounds half up
        let events = [event(EventKind::FocusLost, Some(6_500))];
        assert_eq!(compute_integrity_score(&events), 94);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let events = vec![event(EventKind::PhoneDetected, None); 8];
        assert_eq!(compute_integrity_score(&events), 0);
    }

    #[test]
    fn test_grades() {
        assert_eq!(IntegrityGrade::from_score(100), IntegrityGrade::Excellent);
        assert_eq!(IntegrityGrade::from_score(80), IntegrityGrade::Excellent);
        assert_eq!(IntegrityGrade::from_score(79), IntegrityGrade::Good);
        assert_eq!(IntegrityGrade::from_score(60), IntegrityGrade::Good);
        assert_eq!(IntegrityGrade::from_score(40), IntegrityGrade::Fair);
        assert_eq!(IntegrityGrade::from_score(39), IntegrityGrade::Poor);
        assert_eq!(IntegrityGrade::Fair.to_string(), "Fair");
    }

    #[test]
    fn test_summary_from_session() {
        let mut session = ProctoringSession::new("Grace Hopper", 1_000).unwrap();
        session.record(event(EventKind::FaceAbsent, Some(12_000)));
        session.record(event(EventKind::PhoneDetected, None));
        session.finish(121_000).unwrap();

        let summary = SessionSummary::from_session(&session, 999_999);
        assert_eq!(summary.integrity_score, 74);
        assert_eq!(summary.grade, IntegrityGrade::Good);
        assert_eq!(summary.duration_ms, 120_000);
        assert_eq!(summary.total_events, 2);
        assert_eq!(summary.total_absent_ms, 12_000);
        assert_eq!(summary.event_breakdown.get(&EventKind::PhoneDetected), Some(&1));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_kind() -> impl Strategy<Value = EventKind> {
            proptest::sample::select(EventKind::ALL.to_vec())
        }

        fn arb_event() -> impl Strategy<Value = DetectionEvent> {
            (arb_kind(), proptest::option::of(0u64..200_000))
                .prop_map(|(kind, duration)| event(kind, duration))
        }

        proptest! {
            #[test]
            fn score_is_within_bounds(events in proptest::collection::vec(arb_event(), 0..64)) {
                let score = compute_integrity_score(&events);
                prop_assert!(score <= 100);
            }

            #[test]
            fn score_ignores_event_order(
                (events, shuffled) in proptest::collection::vec(arb_event(), 0..32)
                    .prop_flat_map(|events| (Just(events.clone()), Just(events).prop_shuffle()))
            ) {
                prop_assert_eq!(
                    compute_integrity_score(&events),
                    compute_integrity_score(&shuffled)
                );
            }

            #[test]
            fn adding_an_event_never_raises_the_score(
                events in proptest::collection::vec(arb_event(), 0..32),
                extra in arb_event()
            ) {
                let before = compute_integrity_score(&events);
                let mut more = events;
                more.push(extra);
                prop_assert!(compute_integrity_score(&more) <= before);
            }
        }
    }
}
