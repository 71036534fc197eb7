//! Myo Monitor: live acquisition and recording for the Myo armband
//!
//! The library listens to armband events, keeps the most recent samples of
//! each stream in bounded buffers, and lets a polling reader copy them out
//! without blocking the event thread for long. It features:
//!
//! - An event listener recording EMG, IMU, signal strength and device state
//! - Fixed-capacity sample buffers, one lock group per stream family
//! - A session history with CSV export
//! - A simulated armband for running without hardware
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use myo_monitor::config::MonitorConfig;
//! use myo_monitor::hal::simulator::SimulatedHub;
//! use myo_monitor::monitor::Monitor;
//!
//! fn main() -> myo_monitor::Result<()> {
//!     let config = MonitorConfig::default();
//!     let hub = SimulatedHub::start(config.simulator.clone())?;
//!     let mut monitor = Monitor::new(hub, config)?;
//!
//!     for _ in 0..100 {
//!         let frame = monitor.tick()?;
//!         println!("{}", frame.status_line());
//!     }
//!
//!     monitor.close(None)?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod config;
pub mod error;
pub mod hal;
pub mod monitor;
pub mod utils;

// Re-export commonly used types for convenience
pub use acquisition::{BoundedBuffer, Category, MyoListener, Sample, SampleStore};
pub use config::{ConfigLoader, MonitorConfig};
pub use error::{MonitorError, Result};
pub use hal::{Device, DeviceHandle, DeviceListener, Hub, HubEvent, Pose};
pub use monitor::{DisplaySnapshot, Monitor, SessionHistory};
pub use utils::time::{current_timestamp_micros, TimeProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Live acquisition and recording for the Myo armband".to_string(),
        features: vec![
            "Armband event listener".to_string(),
            "Bounded per-stream sample buffers".to_string(),
            "Session history with CSV export".to_string(),
            "Simulated armband".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub features: Vec<String>,
}
