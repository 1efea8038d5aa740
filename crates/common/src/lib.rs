//! ProctorVision Common Utilities
//!
//! Shared infrastructure for all ProctorVision crates:
//! - Error types and result aliases
//! - Millisecond clocks used to timestamp monitoring ticks
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
