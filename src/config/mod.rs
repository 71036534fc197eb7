// src/config/mod.rs
//! Monitor configuration with serde defaults and validation

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use crate::hal::simulator::SimulatorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete monitor configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct MonitorConfig {
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

/// Live buffer sizes
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AcquisitionConfig {
    #[serde(default = "defaults::queue_size")]
    pub queue_size: usize,

    #[serde(default = "defaults::rssi_queue_size")]
    pub rssi_queue_size: usize,
}

/// Poll loop timing and chart length
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "defaults::poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "defaults::pump_timeout_ms")]
    pub pump_timeout_ms: u64,

    #[serde(default = "defaults::plot_points")]
    pub plot_points: usize,

    #[serde(default = "defaults::status_every_ticks")]
    pub status_every_ticks: u64,
}

/// Where session exports go by default
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "defaults::save_dir")]
    pub save_dir: PathBuf,

    #[serde(default = "defaults::default_file_name")]
    pub default_file_name: String,
}

mod defaults {
    use crate::config::constants::*;
    use std::path::PathBuf;

    pub fn queue_size() -> usize { acquisition::DEFAULT_QUEUE_SIZE }
    pub fn rssi_queue_size() -> usize { acquisition::DEFAULT_RSSI_QUEUE_SIZE }

    pub fn poll_interval_ms() -> u64 { display::DEFAULT_POLL_INTERVAL_MS }
    pub fn pump_timeout_ms() -> u64 { display::DEFAULT_PUMP_TIMEOUT_MS }
    pub fn plot_points() -> usize { display::DEFAULT_PLOT_POINTS }
    pub fn status_every_ticks() -> u64 { display::DEFAULT_STATUS_EVERY_TICKS }

    pub fn save_dir() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(export::DEFAULT_SAVE_DIR)
    }
    pub fn default_file_name() -> String { export::DEFAULT_FILE_NAME.to_string() }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            queue_size: defaults::queue_size(),
            rssi_queue_size: defaults::rssi_queue_size(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::poll_interval_ms(),
            pump_timeout_ms: defaults::pump_timeout_ms(),
            plot_points: defaults::plot_points(),
            status_every_ticks: defaults::status_every_ticks(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            save_dir: defaults::save_dir(),
            default_file_name: defaults::default_file_name(),
        }
    }
}

impl DisplayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn pump_timeout(&self) -> Duration {
        Duration::from_millis(self.pump_timeout_ms)
    }
}

impl ExportConfig {
    /// Path used when no explicit output is given
    pub fn default_path(&self) -> PathBuf {
        self.save_dir.join(&self.default_file_name)
    }
}

impl MonitorConfig {
    /// Check value ranges; every violation is reported, not just the first
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.acquisition.queue_size == 0 {
            problems.push("acquisition.queue_size must be greater than 0".to_string());
        }
        if self.acquisition.rssi_queue_size == 0 {
            problems.push("acquisition.rssi_queue_size must be greater than 0".to_string());
        }
        if self.display.poll_interval_ms == 0 {
            problems.push("display.poll_interval_ms must be greater than 0".to_string());
        }
        if self.display.plot_points == 0 {
            problems.push("display.plot_points must be greater than 0".to_string());
        }
        if self.display.status_every_ticks == 0 {
            problems.push("display.status_every_ticks must be greater than 0".to_string());
        }
        if self.export.default_file_name.trim().is_empty() {
            problems.push("export.default_file_name cannot be empty".to_string());
        }
        if let Err(e) = self.simulator.validate() {
            problems.push(e);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems))
        }
    }
}
