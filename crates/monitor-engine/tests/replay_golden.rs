//! Golden replay of the sample interview fixture.

use std::path::PathBuf;
use std::sync::Arc;

use proctor_integrity_core::{compute_integrity_score, IntegrityGrade, SessionSummary};
use proctor_monitor_engine::{replay, SchedulerConfig, TickScript};
use proctor_session_model::event::{parse_events, serialize_events, EventKind};
use proctor_session_model::session::ProctoringSession;

const T0: u64 = 1_700_000_000_000;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/sample-interview/ticks.jsonl")
}

#[tokio::test]
async fn sample_interview_replays_to_known_events() {
    let script = Arc::new(TickScript::load(&fixture()).unwrap());
    assert_eq!(script.len(), 28);

    let outcome = replay(script, &SchedulerConfig::default(), T0).await;

    let expected: [(EventKind, u64, Option<u64>, Option<f64>); 6] = [
        (EventKind::FocusLost, T0 + 1_000, Some(6_000), None),
        (EventKind::MultipleFaces, T0 + 8_000, None, None),
        (EventKind::MultipleFaces, T0 + 9_000, None, None),
        (EventKind::PhoneDetected, T0 + 10_000, None, Some(0.87)),
        (EventKind::FaceAbsent, T0 + 12_000, Some(12_000), None),
        (EventKind::DeviceDetected, T0 + 24_000, None, Some(0.66)),
    ];
    let actual: Vec<_> = outcome
        .events
        .iter()
        .map(|e| (e.kind, e.timestamp, e.duration, e.confidence))
        .collect();
    assert_eq!(actual, expected);

    let descriptions: Vec<_> = outcome
        .events
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        [
            "Lost focus for 6 seconds",
            "2 faces detected in frame",
            "2 faces detected in frame",
            "cell phone detected with 87% confidence",
            "Face was absent for 12 seconds",
            "laptop detected with 66% confidence",
        ]
    );

    assert_eq!(outcome.ended_at, T0 + 27_000);
    assert!(outcome.final_state.is_face_present);
    assert!(outcome.final_state.is_focused);
    assert_eq!(outcome.final_state.face_count, 1);
    assert!(outcome.final_state.detected_objects.is_empty());

    // 100 - 6 - 5 - 5 - 20 - 6 - 10
    assert_eq!(compute_integrity_score(&outcome.events), 48);
}

#[tokio::test]
async fn sample_interview_summary_survives_event_log_round_trip() {
    let script = Arc::new(TickScript::load(&fixture()).unwrap());
    let outcome = replay(script, &SchedulerConfig::default(), T0).await;

    let jsonl = serialize_events(&outcome.events).unwrap();
    let restored = parse_events(&jsonl).unwrap();
    assert_eq!(restored, outcome.events);

    let mut session = ProctoringSession::new("Ada Lovelace", T0).unwrap();
    for event in restored {
        session.record(event);
    }
    session.finish(outcome.ended_at).unwrap();

    let summary = SessionSummary::from_session(&session, outcome.ended_at);
    assert_eq!(summary.integrity_score, 48);
    assert_eq!(summary.grade, IntegrityGrade::Fair);
    assert_eq!(summary.duration_ms, 27_000);
    assert_eq!(summary.total_focus_lost_ms, 6_000);
    assert_eq!(summary.total_absent_ms, 12_000);
    assert_eq!(summary.event_breakdown.get(&EventKind::MultipleFaces), Some(&2));
}
