// src/monitor/driver.rs
//! Polling driver tying the hub, listener and session history together
//!
//! Each [`Monitor::tick`] pumps the hub for one bounded slice of time, asks
//! the band for a signal strength reading, copies the live windows into
//! the history and returns a fresh [`DisplaySnapshot`].

use crate::acquisition::listener::MyoListener;
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::hal::traits::{DeviceError, Hub, HubError};
use crate::hal::types::VibrationType;
use crate::monitor::display::DisplaySnapshot;
use crate::monitor::export::{export_history, ExportError, ExportSummary};
use crate::monitor::history::SessionHistory;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

pub struct Monitor<H: Hub> {
    hub: H,
    listener: Arc<MyoListener>,
    history: SessionHistory,
    config: MonitorConfig,
    ticks: u64,
}

impl<H: Hub> Monitor<H> {
    pub fn new(hub: H, config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        let listener = MyoListener::new(
            config.acquisition.queue_size,
            config.acquisition.rssi_queue_size,
        )?;

        debug!(
            queue_size = config.acquisition.queue_size,
            rssi_queue_size = config.acquisition.rssi_queue_size,
            "monitor created"
        );

        Ok(Self {
            hub,
            listener: Arc::new(listener),
            history: SessionHistory::new(),
            config,
            ticks: 0,
        })
    }

    /// Pump the hub once, poll the live windows and build a frame
    pub fn tick(&mut self) -> std::result::Result<DisplaySnapshot, HubError> {
        self.hub.run(self.listener.as_ref(), self.config.display.pump_timeout())?;

        // The reply lands in the RSSI buffer on a later pump.
        if let Some(device) = self.listener.device() {
            if let Err(e) = device.request_rssi() {
                warn!("RSSI request failed: {}", e);
            }
        }

        let batch = self.listener.read_batch();
        let added = self.history.append(&batch);
        self.ticks += 1;
        trace!(tick = self.ticks, polled = batch.len(), added, "poll complete");

        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot::build(
            &self.listener.state(),
            &self.history,
            &self.listener.get_rssi_samples(),
            self.config.display.plot_points,
        )
    }

    pub fn vibrate(&self, kind: VibrationType) -> std::result::Result<(), DeviceError> {
        let device = self.listener.device().ok_or(DeviceError::NotConnected)?;
        device.vibrate(kind)
    }

    /// Export the history; a failure leaves the history untouched
    pub fn save(&self, path: &Path) -> std::result::Result<ExportSummary, ExportError> {
        export_history(&self.history, path).map_err(|e| {
            warn!("Session not saved: {}", e);
            e
        })
    }

    /// Save to `target` when given, then release the hub
    ///
    /// The hub is stopped even when saving fails; the save error is still
    /// returned.
    pub fn close(&mut self, target: Option<&Path>) -> std::result::Result<Option<ExportSummary>, ExportError> {
        let saved = match target {
            Some(path) => self.save(path).map(Some),
            None => {
                warn!("data not saved");
                Ok(None)
            }
        };

        self.hub.stop();
        info!(ticks = self.ticks, samples = self.history.total_len(), "monitor closed");
        saved
    }

    pub fn listener(&self) -> &Arc<MyoListener> {
        &self.listener
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn hub(&self) -> &H {
        &self.hub
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
