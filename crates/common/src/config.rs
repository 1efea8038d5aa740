//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tick cadence and hysteresis thresholds.
    #[serde(default)]
    pub monitoring: MonitoringDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default monitoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringDefaults {
    /// Interval between classification ticks (ms).
    pub tick_interval_ms: u64,

    /// Minimum absence span reported as `face_absent` (ms, strict).
    pub absence_threshold_ms: u64,

    /// Minimum focus-loss span reported as `focus_lost` (ms, strict).
    pub focus_threshold_ms: u64,

    /// Maximum eye-centre deviation, as a fraction of face width, still
    /// counted as focused.
    pub focus_deviation_ratio: f64,

    /// Objects must score strictly above this to raise an event.
    pub object_confidence_threshold: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "proctor=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for MonitoringDefaults {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            absence_threshold_ms: 10_000,
            focus_threshold_ms: 5_000,
            focus_deviation_ratio: 0.3,
            object_confidence_threshold: 0.5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("proctorvision").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_monitoring_constants() {
        let config = AppConfig::default();
        assert_eq!(config.monitoring.tick_interval_ms, 1_000);
        assert_eq!(config.monitoring.absence_threshold_ms, 10_000);
        assert_eq!(config.monitoring.focus_threshold_ms, 5_000);
        assert!((config.monitoring.focus_deviation_ratio - 0.3).abs() < 1e-12);
        assert!((config.monitoring.object_confidence_threshold - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "monitoring": { "focus_threshold_ms": 8000 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.monitoring.focus_threshold_ms, 8_000);
        assert_eq!(config.monitoring.absence_threshold_ms, 10_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!(
            "proctor-config-test-{}",
            std::process::id()
        ));
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.monitoring.tick_interval_ms = 250;
        config.logging.json = true;
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path), config);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unparseable_config_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!(
            "proctor-config-bad-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }
}
