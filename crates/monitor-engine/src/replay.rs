//! Offline replay of a tick script.
//!
//! Runs the same adapter and tracker as a live run, without timers: tick
//! `i` is stamped `started_at + i * tick_interval`.

use std::sync::Arc;

use proctor_integrity_core::tracker::StateTracker;
use proctor_session_model::event::{DetectionEvent, TimestampMs};
use proctor_session_model::state::DetectionState;

use crate::classifier::ClassifierAdapter;
use crate::frame::Frame;
use crate::scheduler::SchedulerConfig;
use crate::script::{ScriptedClassifier, TickScript};

/// What a replay produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    /// Events in emission order.
    pub events: Vec<DetectionEvent>,
    /// Detection state after the last tick.
    pub final_state: DetectionState,
    /// Timestamp of the last tick, or `started_at` for an empty script.
    pub ended_at: TimestampMs,
}

/// Replay `script` as if monitoring had started at `started_at`.
pub async fn replay(
    script: Arc<TickScript>,
    config: &SchedulerConfig,
    started_at: TimestampMs,
) -> ReplayOutcome {
    let adapter = ClassifierAdapter::from_backend(Arc::new(ScriptedClassifier::new(
        script.clone(),
    )));
    let mut tracker = StateTracker::new(config.tracker.clone(), started_at);
    let interval_ms = u64::try_from(config.tick_interval.as_millis()).unwrap_or(u64::MAX);

    let mut events = Vec::new();
    let mut ended_at = started_at;
    for sequence in 0..script.len() as u64 {
        let now = started_at.saturating_add(sequence.saturating_mul(interval_ms));
        let result = adapter.classify(&Frame::empty(sequence)).await;
        events.extend(tracker.update(&result, now));
        ended_at = now;
    }

    tracing::info!(
        ticks = script.len(),
        events = events.len(),
        "Replay finished"
    );

    ReplayOutcome {
        events,
        final_state: tracker.snapshot(),
        ended_at,
    }
}
