//! ProctorVision Monitor Engine
//!
//! Drives the detection pipeline against a live frame source. Each tick the
//! scheduler grabs the current frame, runs both classifiers through the
//! fail-open adapter, feeds the result to the state tracker, and hands any
//! completed events to the session sink.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                    Scheduler                      │
//! │  interval tick ──► FrameSource::current_frame     │
//! │                        │                          │
//! │                        ▼                          │
//! │              ClassifierAdapter                    │
//! │       ┌────────────────┴────────────────┐         │
//! │       ▼                                 ▼         │
//! │  FaceDetector                    ObjectDetector   │
//! │       └────────────────┬────────────────┘         │
//! │                        ▼                          │
//! │                  StateTracker ──► DetectionState  │
//! │                        │          (watch channel) │
//! │                        ▼                          │
//! │                    EventSink                      │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Cancellation is generation based: stopping a run bumps a counter, and a
//! classification that finishes for an outdated generation is discarded.

pub mod classifier;
pub mod frame;
pub mod replay;
pub mod scheduler;
pub mod script;

pub use classifier::{ClassifierAdapter, FaceDetector, ObjectDetector};
pub use frame::{Frame, FrameSource};
pub use replay::{replay, ReplayOutcome};
pub use scheduler::{MonitorHandle, Scheduler, SchedulerConfig, SchedulerState, TickClock};
pub use script::{ScriptedClassifier, ScriptedFrameSource, ScriptedTick, TickScript};
