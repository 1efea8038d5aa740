//! Replay a tick script offline.

use std::path::PathBuf;
use std::sync::Arc;

use proctor_common::clock::{Clock, SystemClock};
use proctor_common::config::AppConfig;
use proctor_integrity_core::SessionSummary;
use proctor_monitor_engine::{replay, TickScript};
use proctor_session_model::event::serialize_events;
use proctor_session_model::session::ProctoringSession;

use crate::report;

pub async fn run(
    script_path: PathBuf,
    candidate: String,
    interval_ms: Option<u64>,
    jsonl: bool,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let script = TickScript::load(&script_path)
        .map_err(|e| anyhow::anyhow!("Failed to load script: {e}"))?;
    let scheduler_config = super::scheduler_config(config, interval_ms);

    let started_at = SystemClock.now_ms();
    let mut session = ProctoringSession::new(&candidate, started_at)?;

    let outcome = replay(Arc::new(script), &scheduler_config, started_at).await;
    for event in outcome.events {
        session.record(event);
    }
    session.finish(outcome.ended_at)?;

    if jsonl {
        print!("{}", serialize_events(session.events())?);
        return Ok(());
    }

    println!("Replayed: {}", script_path.display());
    println!();
    if session.events().is_empty() {
        println!("  No integrity events.");
    }
    for event in session.events() {
        report::print_event(event, started_at);
    }
    report::print_summary(&SessionSummary::from_session(&session, outcome.ended_at));

    Ok(())
}
