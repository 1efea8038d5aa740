//! ProctorVision Integrity Core
//!
//! Turns per-tick classifier output into integrity events and scores:
//! - **Focus:** Decide from eye landmarks whether the candidate faces the screen
//! - **Tracker:** Hysteresis state machine over presence and focus spans
//! - **Emitter:** Build immutable `DetectionEvent` records with fresh ids
//! - **Score:** Pure integrity score and session summary over an event log
//!
//! This crate is pure computation — no I/O, no timers, no async.
//! All inputs are data; all outputs are data.

pub mod emitter;
pub mod focus;
pub mod score;
pub mod tracker;

pub use emitter::EventEmitter;
pub use focus::is_focused;
pub use score::{compute_integrity_score, IntegrityGrade, SessionSummary};
pub use tracker::{StateTracker, TrackerConfig};
