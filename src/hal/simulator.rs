// src/hal/simulator.rs
//! Simulated armband and hub, usable without the vendor runtime
//!
//! The hub keeps the cooperative contract of the real one: a generator
//! thread queues events, and they reach the listener only while
//! [`Hub::run`] is pumping.

use crate::config::constants::simulation;
use crate::hal::events::{DeviceListener, HubEvent};
use crate::hal::simulation::MyoSignalGenerator;
use crate::hal::traits::{Device, DeviceError, Hub, HubError};
use crate::hal::types::VibrationType;
use crate::utils::time::{MonotonicTimeProvider, TimeProvider};
use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Simulated armband configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SimulatorConfig {
    #[serde(default = "defaults::device_name")]
    pub device_name: String,
    #[serde(default = "defaults::firmware_version")]
    pub firmware_version: [u32; 4],
    #[serde(default = "defaults::emg_rate_hz")]
    pub emg_rate_hz: u32,
    #[serde(default = "defaults::imu_rate_hz")]
    pub imu_rate_hz: u32,
    #[serde(default = "defaults::warmup_ms")]
    pub warmup_ms: u64,
    #[serde(default = "defaults::battery_start")]
    pub battery_start: u8,
    #[serde(default = "defaults::pose_period_ms")]
    pub pose_period_ms: u64,
    /// Raw attenuation reported in RSSI replies
    #[serde(default = "defaults::rssi_raw")]
    pub rssi_raw: i32,
    #[serde(default = "defaults::emg_amplitude")]
    pub emg_amplitude: f32,
    #[serde(default = "defaults::seed")]
    pub seed: u64,
}

mod defaults {
    use crate::config::constants::simulation::*;

    pub fn device_name() -> String { DEFAULT_DEVICE_NAME.to_string() }
    pub fn firmware_version() -> [u32; 4] { DEFAULT_FIRMWARE_VERSION }
    pub fn emg_rate_hz() -> u32 { DEFAULT_EMG_RATE_HZ }
    pub fn imu_rate_hz() -> u32 { DEFAULT_IMU_RATE_HZ }
    pub fn warmup_ms() -> u64 { DEFAULT_WARMUP_MS }
    pub fn battery_start() -> u8 { DEFAULT_BATTERY_START }
    pub fn pose_period_ms() -> u64 { DEFAULT_POSE_PERIOD_MS }
    pub fn rssi_raw() -> i32 { DEFAULT_RSSI_RAW }
    pub fn emg_amplitude() -> f32 { DEFAULT_EMG_AMPLITUDE }
    pub fn seed() -> u64 { DEFAULT_SEED }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            device_name: defaults::device_name(),
            firmware_version: defaults::firmware_version(),
            emg_rate_hz: defaults::emg_rate_hz(),
            imu_rate_hz: defaults::imu_rate_hz(),
            warmup_ms: defaults::warmup_ms(),
            battery_start: defaults::battery_start(),
            pose_period_ms: defaults::pose_period_ms(),
            rssi_raw: defaults::rssi_raw(),
            emg_amplitude: defaults::emg_amplitude(),
            seed: defaults::seed(),
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.device_name.trim().is_empty() {
            return Err("simulator.device_name cannot be empty".to_string());
        }
        if self.emg_rate_hz == 0 || self.imu_rate_hz == 0 {
            return Err("simulator stream rates must be greater than 0".to_string());
        }
        if self.battery_start > 100 {
            return Err(format!("simulator.battery_start {} exceeds 100", self.battery_start));
        }
        if self.pose_period_ms == 0 {
            return Err("simulator.pose_period_ms must be greater than 0".to_string());
        }
        if !(0.0..=128.0).contains(&self.emg_amplitude) {
            return Err(format!("simulator.emg_amplitude {} outside 0..=128", self.emg_amplitude));
        }
        Ok(())
    }
}

/// Simulator errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    #[error("invalid simulator configuration: {0}")]
    Configuration(String),
    #[error("failed to spawn generator thread: {0}")]
    Spawn(String),
}

// ── SimulatedDevice ──────────────────────────────────────────────────────────

/// Command side of the simulated band
///
/// Commands that the real band answers asynchronously (lock, unlock, RSSI)
/// queue the matching reply event on the hub.
pub struct SimulatedDevice {
    sender: Sender<HubEvent>,
    connected: AtomicBool,
    streaming_emg: AtomicBool,
    rssi_raw: i32,
    time_provider: Arc<dyn TimeProvider>,
    vibrations: Mutex<Vec<VibrationType>>,
}

impl SimulatedDevice {
    fn new(sender: Sender<HubEvent>, rssi_raw: i32, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            sender,
            connected: AtomicBool::new(true),
            streaming_emg: AtomicBool::new(false),
            rssi_raw,
            time_provider,
            vibrations: Mutex::new(Vec::new()),
        }
    }

    pub fn is_streaming_emg(&self) -> bool {
        self.streaming_emg.load(Ordering::Relaxed)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Vibrations requested so far
    pub fn vibrations(&self) -> Vec<VibrationType> {
        self.vibrations.lock().clone()
    }

    pub(crate) fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::Relaxed);
        self.streaming_emg.store(false, Ordering::Relaxed);
    }

    fn ensure_connected(&self) -> Result<(), DeviceError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(DeviceError::NotConnected)
        }
    }

    fn reply(&self, event: HubEvent) -> Result<(), DeviceError> {
        let command = event.kind();
        self.sender.send(event).map_err(|_| DeviceError::CommandRejected {
            command,
            reason: "hub is gone".to_string(),
        })
    }
}

impl Device for SimulatedDevice {
    fn vibrate(&self, kind: VibrationType) -> Result<(), DeviceError> {
        self.ensure_connected()?;
        debug!(?kind, "simulated vibration");
        self.vibrations.lock().push(kind);
        Ok(())
    }

    fn lock(&self) -> Result<(), DeviceError> {
        self.ensure_connected()?;
        self.reply(HubEvent::Locked { timestamp: self.time_provider.now_micros() })
    }

    fn unlock(&self) -> Result<(), DeviceError> {
        self.ensure_connected()?;
        self.reply(HubEvent::Unlocked { timestamp: self.time_provider.now_micros() })
    }

    fn request_rssi(&self) -> Result<(), DeviceError> {
        self.ensure_connected()?;
        self.reply(HubEvent::Rssi {
            timestamp: self.time_provider.now_micros(),
            rssi: self.rssi_raw,
        })
    }

    fn stream_emg(&self, enabled: bool) -> Result<(), DeviceError> {
        self.ensure_connected()?;
        self.streaming_emg.store(enabled, Ordering::Relaxed);
        Ok(())
    }
}

// ── SimulatedHub ─────────────────────────────────────────────────────────────

/// Hub backed by an in-process event queue
pub struct SimulatedHub {
    events: Receiver<HubEvent>,
    sender: Sender<HubEvent>,
    stopped: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
    device: Mutex<Option<Arc<SimulatedDevice>>>,
    time_provider: Arc<dyn TimeProvider>,
}

impl SimulatedHub {
    /// Hub with no generator; events come only from [`SimulatedHub::inject`]
    /// and from replies of devices made by [`SimulatedHub::create_device`]
    pub fn manual(time_provider: Arc<dyn TimeProvider>) -> Self {
        let (sender, events) = unbounded();
        Self {
            events,
            sender,
            stopped: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
            device: Mutex::new(None),
            time_provider,
        }
    }

    /// Hub with a generator thread emulating a connected armband
    pub fn start(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate().map_err(SimulatorError::Configuration)?;

        let time_provider: Arc<dyn TimeProvider> = Arc::new(MonotonicTimeProvider::new());
        let hub = Self::manual(time_provider.clone());
        let device = hub.create_device(config.rssi_raw);

        let mut generator = MyoSignalGenerator::new(config, device);
        let sender = hub.sender.clone();
        let stopped = hub.stopped.clone();
        let tick = Duration::from_millis(simulation::GENERATOR_TICK_MS);

        let handle = thread::Builder::new()
            .name("myo-simulator".to_string())
            .spawn(move || {
                while !stopped.load(Ordering::Relaxed) {
                    for event in generator.advance(time_provider.now_micros()) {
                        if sender.send(event).is_err() {
                            return;
                        }
                    }
                    thread::sleep(tick);
                }
            })
            .map_err(|e| SimulatorError::Spawn(e.to_string()))?;

        *hub.worker.lock() = Some(handle);
        info!("simulated armband started");
        Ok(hub)
    }

    /// Build a device whose replies are queued on this hub
    pub fn create_device(&self, rssi_raw: i32) -> Arc<SimulatedDevice> {
        let device = Arc::new(SimulatedDevice::new(
            self.sender.clone(),
            rssi_raw,
            self.time_provider.clone(),
        ));
        *self.device.lock() = Some(device.clone());
        device
    }

    /// Device most recently created on this hub
    pub fn device(&self) -> Option<Arc<SimulatedDevice>> {
        self.device.lock().clone()
    }

    /// Queue an event for the next pump
    pub fn inject(&self, event: HubEvent) {
        // The hub owns a receiver, so the channel cannot be closed here.
        let _ = self.sender.send(event);
    }

    /// Events queued but not yet delivered
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

impl Hub for SimulatedHub {
    fn run(&self, listener: &dyn DeviceListener, timeout: Duration) -> Result<(), HubError> {
        if self.is_stopped() {
            return Err(HubError::Stopped);
        }

        let deadline = Instant::now() + timeout;
        loop {
            match self.events.recv_deadline(deadline) {
                Ok(event) => listener.on_event(&event),
                Err(RecvTimeoutError::Timeout) => return Ok(()),
                Err(RecvTimeoutError::Disconnected) => return Err(HubError::Stopped),
            }
        }
    }

    fn stop(&self) {
        if self.stopped.swap(true, Ordering::Relaxed) {
            return;
        }
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
        if let Some(device) = self.device.lock().as_ref() {
            device.mark_disconnected();
        }
        info!("hub stopped");
    }
}

impl Drop for SimulatedHub {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::MockTimeProvider;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingListener {
        events: AtomicUsize,
        rssi: Mutex<Vec<i32>>,
    }

    impl DeviceListener for CountingListener {
        fn on_event(&self, event: &HubEvent) {
            self.events.fetch_add(1, Ordering::Relaxed);
            if let HubEvent::Rssi { rssi, .. } = event {
                self.rssi.lock().push(*rssi);
            }
        }
    }

    fn manual_hub() -> SimulatedHub {
        SimulatedHub::manual(Arc::new(MockTimeProvider::new(1_000)))
    }

    #[test]
    fn test_events_wait_for_pump() {
        let hub = manual_hub();
        let listener = CountingListener::default();
        hub.inject(HubEvent::Paired { timestamp: 1 });
        hub.inject(HubEvent::Locked { timestamp: 2 });

        assert_eq!(hub.pending(), 2);
        assert_eq!(listener.events.load(Ordering::Relaxed), 0);

        hub.run(&listener, Duration::from_millis(5)).unwrap();
        assert_eq!(listener.events.load(Ordering::Relaxed), 2);
        assert_eq!(hub.pending(), 0);
    }

    #[test]
    fn test_rssi_request_replies_through_hub() {
        let hub = manual_hub();
        let device = hub.create_device(-61);
        let listener = CountingListener::default();

        device.request_rssi().unwrap();
        hub.run(&listener, Duration::from_millis(5)).unwrap();
        assert_eq!(*listener.rssi.lock(), vec![-61]);
    }

    #[test]
    fn test_stop_rejects_pump_and_commands() {
        let hub = manual_hub();
        let device = hub.create_device(-50);
        hub.stop();

        let listener = CountingListener::default();
        assert_eq!(hub.run(&listener, Duration::from_millis(1)), Err(HubError::Stopped));
        assert_eq!(device.vibrate(VibrationType::Short), Err(DeviceError::NotConnected));
        assert!(hub.is_stopped());
    }

    #[test]
    fn test_stream_emg_flag() {
        let hub = manual_hub();
        let device = hub.create_device(-50);
        assert!(!device.is_streaming_emg());
        device.stream_emg(true).unwrap();
        assert!(device.is_streaming_emg());
    }

    #[test]
    fn test_generator_thread_connects() {
        let config = SimulatorConfig { warmup_ms: 0, ..Default::default() };
        let hub = SimulatedHub::start(config).unwrap();
        let listener = CountingListener::default();

        hub.run(&listener, Duration::from_millis(60)).unwrap();
        assert!(listener.events.load(Ordering::Relaxed) > 0);
        hub.stop();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulatorConfig { emg_rate_hz: 0, ..Default::default() };
        assert!(matches!(SimulatedHub::start(config), Err(SimulatorError::Configuration(_))));
    }
}
