pub mod config;
pub mod monitor;
pub mod replay;
pub mod score;

use std::time::Duration;

use proctor_common::config::AppConfig;
use proctor_monitor_engine::SchedulerConfig;

/// Scheduler settings from the config file, with an optional interval override.
pub(crate) fn scheduler_config(config: &AppConfig, interval_ms: Option<u64>) -> SchedulerConfig {
    let mut scheduler = SchedulerConfig::from(&config.monitoring);
    if let Some(ms) = interval_ms {
        scheduler.tick_interval = Duration::from_millis(ms.max(1));
    }
    scheduler
}
