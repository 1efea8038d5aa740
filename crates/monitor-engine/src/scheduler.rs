//! Tick scheduler.
//!
//! One run is a single tokio task: each tick grabs a frame, awaits the
//! classification, and finishes the tracker update before the next tick is
//! taken. Runs are identified by a generation number published on a watch
//! channel. Stopping a run bumps the generation, which the task observes
//! both between ticks and while a classification is in flight; a
//! classification belonging to an outdated generation never touches the
//! tracker or the sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use proctor_common::clock::{Clock, SystemClock};
use proctor_common::config::MonitoringDefaults;
use proctor_integrity_core::tracker::{StateTracker, TrackerConfig};
use proctor_session_model::state::{DetectionState, EventSink};

use crate::classifier::ClassifierAdapter;
use crate::frame::FrameSource;

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Time between ticks.
    pub tick_interval: Duration,

    /// Thresholds for each run's tracker.
    pub tracker: TrackerConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1_000),
            tracker: TrackerConfig::default(),
        }
    }
}

impl From<&MonitoringDefaults> for SchedulerConfig {
    fn from(defaults: &MonitoringDefaults) -> Self {
        Self {
            tick_interval: Duration::from_millis(defaults.tick_interval_ms.max(1)),
            tracker: TrackerConfig::from(defaults),
        }
    }
}

/// Whether the scheduler currently has a live run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Millisecond clock for tick timestamps.
///
/// Anchored to a wall clock once, then advanced by the tokio monotonic
/// clock, so tick times never go backwards and follow paused test time.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    anchor_ms: u64,
    anchor: Instant,
}

impl TickClock {
    pub fn anchored(wall: &dyn Clock) -> Self {
        Self {
            anchor_ms: wall.now_ms(),
            anchor: Instant::now(),
        }
    }
}

impl Clock for TickClock {
    fn now_ms(&self) -> u64 {
        let elapsed = u64::try_from(self.anchor.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.anchor_ms.saturating_add(elapsed)
    }
}

/// Handle to one monitoring run.
///
/// Stopping through the handle only affects the run it was issued for; a
/// handle from an earlier run cannot stop a later one.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    generation: u64,
    control: Arc<watch::Sender<u64>>,
}

impl MonitorHandle {
    /// Stop the run. Returns `false` if it was already stopped.
    pub fn stop(&self) -> bool {
        let stopped = self.control.send_if_modified(|current| {
            if *current == self.generation {
                *current += 1;
                true
            } else {
                false
            }
        });
        if stopped {
            tracing::info!(generation = self.generation, "Monitoring stopped");
        }
        stopped
    }

    pub fn is_running(&self) -> bool {
        *self.control.borrow() == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Drives the tick pipeline for at most one run at a time.
pub struct Scheduler {
    config: SchedulerConfig,
    classifier: ClassifierAdapter,
    wall_clock: Arc<dyn Clock>,
    control: Arc<watch::Sender<u64>>,
    snapshot: Arc<watch::Sender<DetectionState>>,
    active: Option<MonitorHandle>,
    task: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig, classifier: ClassifierAdapter) -> Self {
        Self::with_clock(config, classifier, Arc::new(SystemClock))
    }

    /// Use `wall_clock` to anchor tick timestamps.
    pub fn with_clock(
        config: SchedulerConfig,
        classifier: ClassifierAdapter,
        wall_clock: Arc<dyn Clock>,
    ) -> Self {
        let (control, _) = watch::channel(0);
        let (snapshot, _) = watch::channel(DetectionState::default());
        Self {
            config,
            classifier,
            wall_clock,
            control: Arc::new(control),
            snapshot: Arc::new(snapshot),
            active: None,
            task: None,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        match &self.active {
            Some(handle) if handle.is_running() => SchedulerState::Running,
            _ => SchedulerState::Idle,
        }
    }

    /// Live detection state, updated after every applied tick.
    pub fn subscribe(&self) -> watch::Receiver<DetectionState> {
        self.snapshot.subscribe()
    }

    /// Start a run. Any previous run is stopped first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        &mut self,
        source: Arc<dyn FrameSource>,
        sink: Arc<dyn EventSink>,
    ) -> MonitorHandle {
        self.stop();

        self.control.send_modify(|generation| *generation += 1);
        let generation = *self.control.borrow();
        let handle = MonitorHandle {
            generation,
            control: self.control.clone(),
        };

        let clock = TickClock::anchored(self.wall_clock.as_ref());
        let started_at = clock.now_ms();
        self.snapshot.send_replace(DetectionState::default());

        let run = Run {
            generation,
            tick_interval: self.config.tick_interval,
            tracker: StateTracker::new(self.config.tracker.clone(), started_at),
            classifier: self.classifier.clone(),
            clock,
            source,
            sink,
            cancel: self.control.subscribe(),
            snapshot: self.snapshot.clone(),
        };

        tracing::info!(
            generation,
            started_at,
            interval_ms = self.config.tick_interval.as_millis() as u64,
            "Monitoring started"
        );
        self.task = Some(tokio::spawn(run.execute()));
        self.active = Some(handle.clone());
        handle
    }

    /// Stop the current run, if any. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.stop();
        }
    }

    /// Stop the current run and wait for its task to finish.
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Monitoring task ended abnormally");
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Everything one run owns. Dropped when the run ends.
struct Run {
    generation: u64,
    tick_interval: Duration,
    tracker: StateTracker,
    classifier: ClassifierAdapter,
    clock: TickClock,
    source: Arc<dyn FrameSource>,
    sink: Arc<dyn EventSink>,
    cancel: watch::Receiver<u64>,
    snapshot: Arc<watch::Sender<DetectionState>>,
}

impl Run {
    async fn execute(mut self) {
        let mut interval =
            tokio::time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = superseded(&mut self.cancel, self.generation) => break,
                _ = interval.tick() => {}
            }

            let now = self.clock.now_ms();
            let Some(frame) = self.source.current_frame() else {
                tracing::trace!(now, "No frame ready, skipping tick");
                continue;
            };

            let result = tokio::select! {
                biased;
                _ = superseded(&mut self.cancel, self.generation) => None,
                result = self.classifier.classify(&frame) => Some(result),
            };
            // The run may have been stopped while the classifier was finishing.
            let result = match result {
                Some(result) if *self.cancel.borrow() == self.generation => result,
                _ => {
                    tracing::debug!(
                        generation = self.generation,
                        frame = frame.sequence,
                        "Discarding classification from stopped run"
                    );
                    break;
                }
            };

            let events = self.tracker.update(&result, now);
            self.snapshot.send_replace(self.tracker.snapshot());
            for event in events {
                self.sink.deliver(event);
            }
        }

        tracing::debug!(generation = self.generation, "Monitoring task finished");
    }
}

/// Resolves once `generation` is no longer current, or the scheduler is gone.
async fn superseded(cancel: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        let current = *cancel.borrow_and_update();
        if current != generation || cancel.changed().await.is_err() {
            return;
        }
    }
}
