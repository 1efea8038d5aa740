//! Run the live scheduler against a tick script.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use proctor_common::clock::{Clock, SystemClock};
use proctor_common::config::AppConfig;
use proctor_integrity_core::SessionSummary;
use proctor_monitor_engine::{
    ClassifierAdapter, Scheduler, ScriptedClassifier, ScriptedFrameSource, TickScript,
};
use proctor_session_model::event::DetectionEvent;
use proctor_session_model::session::ProctoringSession;
use proctor_session_model::state::EventSink;

use crate::report;

pub async fn run(
    script_path: PathBuf,
    candidate: String,
    interval_ms: Option<u64>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let script = Arc::new(
        TickScript::load(&script_path)
            .map_err(|e| anyhow::anyhow!("Failed to load script: {e}"))?,
    );
    if script.is_empty() {
        anyhow::bail!("Script has no ticks: {}", script_path.display());
    }

    let scheduler_config = super::scheduler_config(config, interval_ms);
    let source = Arc::new(ScriptedFrameSource::new(&script));
    let adapter =
        ClassifierAdapter::from_backend(Arc::new(ScriptedClassifier::new(script.clone())));
    let mut scheduler = Scheduler::new(scheduler_config, adapter);

    let started_at = SystemClock.now_ms();
    let session = Arc::new(Mutex::new(ProctoringSession::new(&candidate, started_at)?));

    println!("Monitoring {candidate} ({} ticks)", script.len());
    println!("Press Ctrl+C to stop...");
    println!();

    let log = session.clone();
    let sink = Arc::new(move |event: DetectionEvent| {
        report::print_event(&event, started_at);
        log.deliver(event);
    });

    let mut live = scheduler.subscribe();
    let handle = scheduler.start(source.clone(), sink);
    tracing::debug!(generation = handle.generation(), "Monitoring run started");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result?;
                println!();
                println!("Interrupted.");
                break;
            }
            changed = live.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = live.borrow_and_update().clone();
                tracing::debug!(
                    face_present = state.is_face_present,
                    focused = state.is_focused,
                    faces = state.face_count,
                    "Tick applied"
                );
                if source.is_exhausted() {
                    break;
                }
            }
        }
    }

    scheduler.shutdown().await;
    println!();
    println!("Ticks served: {}/{}", source.served(), script.len());

    let ended_at = SystemClock.now_ms();
    let mut session = session
        .lock()
        .map_err(|_| anyhow::anyhow!("Session log poisoned"))?;
    session.finish(ended_at)?;
    report::print_summary(&SessionSummary::from_session(&session, ended_at));

    Ok(())
}
