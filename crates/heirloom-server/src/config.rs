//! Server configuration — parsed from TOML file + environment variable overrides.
//!
//! Priority: environment variables > config file > defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// General server settings
    #[serde(default)]
    pub server: ServerSection,

    /// Countdown monitoring settings
    #[serde(default)]
    pub monitor: MonitorSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSection::default(),
            monitor: MonitorSection::default(),
        }
    }
}

/// General server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Data directory (engine state file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Check interval in seconds (default: 1 hour)
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            check_interval_secs: default_check_interval(),
            log_level: default_log_level(),
        }
    }
}

/// Countdown monitoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSection {
    /// Warn when an owner's countdown drops below these thresholds, in days
    #[serde(default = "default_thresholds")]
    pub warning_threshold_days: Vec<u32>,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            warning_threshold_days: default_thresholds(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/data")
}

fn default_check_interval() -> u64 {
    3600 // 1 hour
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_thresholds() -> Vec<u32> {
    vec![30, 7, 1]
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ServerConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `HEIRLOOM_DATA_DIR`
    /// - `HEIRLOOM_CHECK_INTERVAL`
    /// - `HEIRLOOM_LOG_LEVEL`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("HEIRLOOM_DATA_DIR") {
            self.server.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("HEIRLOOM_CHECK_INTERVAL") {
            if let Ok(secs) = v.parse::<u64>() {
                self.server.check_interval_secs = secs;
            }
        }
        if let Ok(v) = std::env::var("HEIRLOOM_LOG_LEVEL") {
            self.server.log_level = v;
        }
    }

    /// Path of the engine state file inside the data directory.
    pub fn state_path(&self) -> PathBuf {
        self.server.data_dir.join("engine_state.json")
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        // Check interval must be at least 60 seconds
        anyhow::ensure!(
            self.server.check_interval_secs >= 60,
            "server.check_interval_secs must be >= 60"
        );

        // Log level must be one env_logger understands
        anyhow::ensure!(
            matches!(
                self.server.log_level.as_str(),
                "error" | "warn" | "info" | "debug" | "trace"
            ),
            "server.log_level must be one of error/warn/info/debug/trace"
        );

        // Thresholds in descending order keep the daemon's warnings sane
        let mut sorted = self.monitor.warning_threshold_days.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        anyhow::ensure!(
            sorted == self.monitor.warning_threshold_days,
            "monitor.warning_threshold_days must be in descending order"
        );

        Ok(())
    }
}
