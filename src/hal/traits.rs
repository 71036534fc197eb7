// src/hal/traits.rs
//! Core HAL traits for the armband and its event hub

use crate::hal::events::DeviceListener;
use crate::hal::types::VibrationType;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from commands sent to the armband
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    #[error("device is not connected")]
    NotConnected,
    #[error("device rejected command `{command}`: {reason}")]
    CommandRejected { command: &'static str, reason: String },
}

/// Errors from pumping the hub
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HubError {
    #[error("hub has been stopped")]
    Stopped,
}

/// Commands the armband accepts
///
/// Commands are fire-and-forget: replies (RSSI, lock state) come back later
/// as events through [`Hub::run`].
pub trait Device: Send + Sync {
    /// Make the band vibrate
    fn vibrate(&self, kind: VibrationType) -> Result<(), DeviceError>;

    /// Lock the band; it stops reporting poses until unlocked
    fn lock(&self) -> Result<(), DeviceError>;

    /// Unlock the band
    fn unlock(&self) -> Result<(), DeviceError>;

    /// Ask for a signal strength reading
    fn request_rssi(&self) -> Result<(), DeviceError>;

    /// Toggle the continuous EMG stream
    fn stream_emg(&self, enabled: bool) -> Result<(), DeviceError>;
}

/// Shared handle to a connected armband
pub type DeviceHandle = Arc<dyn Device>;

/// Event source for one or more armbands
///
/// Events are only delivered while the hub is pumped. Each call to
/// [`Hub::run`] dispatches pending events to the listener and returns once
/// `timeout` has elapsed.
pub trait Hub: Send {
    /// Deliver events to `listener` for up to `timeout`
    fn run(&self, listener: &dyn DeviceListener, timeout: Duration) -> Result<(), HubError>;

    /// Release the connection; later pumps fail with [`HubError::Stopped`]
    fn stop(&self);
}
