// src/error.rs
//! Unified error type for the monitor
//!
//! Each subsystem keeps its own error enum close to the code that raises
//! it. [`MonitorError`] wraps them so setup code can propagate any of them
//! with `?`.

use crate::acquisition::ring_buffer::BufferError;
use crate::config::ConfigError;
use crate::hal::simulator::SimulatorError;
use crate::hal::traits::{DeviceError, HubError};
use crate::monitor::export::ExportError;
use thiserror::Error;

/// Any error raised while setting up or running the monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Invalid or unreadable configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Buffer construction failed
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// Command sent to the armband failed
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Pumping the hub failed
    #[error(transparent)]
    Hub(#[from] HubError),

    /// Session export failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Simulated armband could not start
    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}

impl MonitorError {
    /// Errors after which the poll loop cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MonitorError::Config(_)
                | MonitorError::Buffer(_)
                | MonitorError::Hub(HubError::Stopped)
                | MonitorError::Simulator(_)
        )
    }
}

/// Result alias using [`MonitorError`]
pub type Result<T> = std::result::Result<T, MonitorError>;
