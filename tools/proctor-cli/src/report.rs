//! Console output shared by the session commands.

use proctor_common::clock::{format_duration_ms, format_timestamp_ms};
use proctor_integrity_core::SessionSummary;
use proctor_session_model::event::{DetectionEvent, TimestampMs};

/// One event as a table row, offset from the session start.
pub fn print_event(event: &DetectionEvent, origin: TimestampMs) {
    println!(
        "  [{:>7.1}s] {:<16} {}",
        event.offset_secs(origin),
        event.kind.as_str(),
        event.description
    );
}

pub fn print_summary(summary: &SessionSummary) {
    println!();
    println!("Session: {}", summary.candidate_name);
    println!("  Started: {}", format_timestamp_ms(summary.start_time));
    if let Some(end) = summary.end_time {
        println!("  Ended: {}", format_timestamp_ms(end));
    }
    println!("  Duration: {}", format_duration_ms(summary.duration_ms));
    println!();

    println!(
        "Integrity score: {}/100 ({})",
        summary.integrity_score, summary.grade
    );
    println!("  Events: {}", summary.total_events);
    println!(
        "  Focus lost: {}",
        format_duration_ms(summary.total_focus_lost_ms)
    );
    println!("  Face absent: {}", format_duration_ms(summary.total_absent_ms));

    for (kind, count) in &summary.event_breakdown {
        println!("  {:<16} {count:>4}", kind.as_str());
    }
}
