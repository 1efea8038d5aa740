//! Score an existing event log.

use std::collections::BTreeMap;
use std::path::PathBuf;

use proctor_integrity_core::score::penalty;
use proctor_integrity_core::{compute_integrity_score, IntegrityGrade};
use proctor_session_model::event::{parse_events, EventKind};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let events =
        parse_events(&content).map_err(|e| anyhow::anyhow!("Invalid event log: {e}"))?;

    let score = compute_integrity_score(&events);
    println!("Events: {}", events.len());
    println!(
        "Integrity score: {score}/100 ({})",
        IntegrityGrade::from_score(score)
    );

    let mut by_kind: BTreeMap<EventKind, (usize, f64)> = BTreeMap::new();
    for event in &events {
        let entry = by_kind.entry(event.kind).or_default();
        entry.0 += 1;
        entry.1 += penalty(event);
    }

    if !by_kind.is_empty() {
        println!();
        println!("Breakdown:");
        for (kind, (count, points)) in by_kind {
            println!("  {:<16} {count:>4}  -{points:.1}", kind.as_str());
        }
    }

    Ok(())
}
