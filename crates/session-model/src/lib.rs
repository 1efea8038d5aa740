//! ProctorVision Session Model
//!
//! Defines the core data contracts for proctoring sessions:
//! - **Events:** Immutable, timestamped integrity events (`DetectionEvent`)
//! - **Classification:** Typed classifier output consumed once per tick
//! - **Session:** The candidate's append-only event log
//! - **State:** Live display snapshot and event sinks
//!
//! All timestamps are wall-clock milliseconds since the Unix epoch.

pub mod classification;
pub mod event;
pub mod session;
pub mod state;

pub use classification::*;
pub use event::*;
pub use session::*;
pub use state::*;
