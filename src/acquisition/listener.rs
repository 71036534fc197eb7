// src/acquisition/listener.rs
//! Event listener that records armband events for a polling reader
//!
//! The hub's dispatch thread is the only writer. Sample buffers go through
//! [`SampleStore`] locks; scalar state uses relaxed atomics, so a reader may
//! see a value one event late but never a torn one.

use crate::acquisition::ring_buffer::BufferError;
use crate::acquisition::sample_store::{
    EmgSample, ImuSample, OrientationSample, RssiSample, SampleBatch, SampleStore,
};
use crate::hal::events::DeviceListener;
use crate::hal::traits::DeviceHandle;
use crate::hal::types::{
    Arm, DeviceIdentity, EmgFrame, FirmwareVersion, Pose, Quaternion, Vector3, XDirection,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tracing::{debug, info, warn};

/// Battery level assumed until the band reports one
const INITIAL_BATTERY_LEVEL: u8 = 100;

/// Point-in-time copy of the scalar device state
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    pub connected: bool,
    pub locked: bool,
    pub warmed_up: bool,
    pub battery_level: u8,
    pub pose: Pose,
    pub identity: DeviceIdentity,
}

/// Records hub events into bounded buffers and device-state fields
pub struct MyoListener {
    store: SampleStore,
    connected: AtomicBool,
    locked: AtomicBool,
    emg_enabled: AtomicBool,
    battery_level: AtomicU8,
    pose: AtomicU8,
    identity: RwLock<DeviceIdentity>,
    device: RwLock<Option<DeviceHandle>>,
}

impl MyoListener {
    pub fn new(queue_size: usize, rssi_queue_size: usize) -> Result<Self, BufferError> {
        Ok(Self::with_store(SampleStore::new(queue_size, rssi_queue_size)?))
    }

    pub fn with_store(store: SampleStore) -> Self {
        Self {
            store,
            connected: AtomicBool::new(false),
            locked: AtomicBool::new(false),
            emg_enabled: AtomicBool::new(false),
            battery_level: AtomicU8::new(INITIAL_BATTERY_LEVEL),
            pose: AtomicU8::new(Pose::Rest.as_u8()),
            identity: RwLock::new(DeviceIdentity::default()),
            device: RwLock::new(None),
        }
    }

    // ── Scalar state ─────────────────────────────────────────────────────────

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// True once the band reported warm-up and EMG streaming was re-enabled
    pub fn is_warmed_up(&self) -> bool {
        self.emg_enabled.load(Ordering::Relaxed)
    }

    pub fn battery_level(&self) -> u8 {
        self.battery_level.load(Ordering::Relaxed)
    }

    pub fn pose(&self) -> Pose {
        Pose::from_u8(self.pose.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn device_name(&self) -> Option<String> {
        self.identity.read().name.clone()
    }

    pub fn firmware_version(&self) -> Option<String> {
        self.identity.read().firmware.clone()
    }

    pub fn arm(&self) -> Option<Arm> {
        self.identity.read().arm
    }

    pub fn x_direction(&self) -> Option<XDirection> {
        self.identity.read().x_direction
    }

    /// Handle to the connected band, if any
    pub fn device(&self) -> Option<DeviceHandle> {
        self.device.read().clone()
    }

    pub fn state(&self) -> DeviceState {
        DeviceState {
            connected: self.is_connected(),
            locked: self.is_locked(),
            warmed_up: self.is_warmed_up(),
            battery_level: self.battery_level(),
            pose: self.pose(),
            identity: self.identity.read().clone(),
        }
    }

    // ── Sample queries ───────────────────────────────────────────────────────

    pub fn get_emg_samples(&self) -> Vec<EmgSample> {
        self.store.emg_samples()
    }

    pub fn get_orientation_samples(&self) -> Vec<OrientationSample> {
        self.store.orientation_samples()
    }

    pub fn get_gyroscope_samples(&self) -> Vec<ImuSample> {
        self.store.gyroscope_samples()
    }

    pub fn get_acceleration_samples(&self) -> Vec<ImuSample> {
        self.store.acceleration_samples()
    }

    pub fn get_rssi_samples(&self) -> Vec<RssiSample> {
        self.store.rssi_samples()
    }

    /// Copy out all four plotted categories
    pub fn read_batch(&self) -> SampleBatch {
        self.store.read_batch()
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    fn enable_emg_stream(device: &DeviceHandle) {
        if let Err(e) = device.stream_emg(true) {
            warn!("Failed to enable EMG streaming: {}", e);
        }
    }
}

impl DeviceListener for MyoListener {
    fn on_paired(&self, timestamp: u64) {
        debug!(timestamp, "armband paired");
    }

    fn on_unpaired(&self, timestamp: u64) {
        debug!(timestamp, "armband unpaired");
    }

    fn on_connected(&self, timestamp: u64, device: &DeviceHandle, name: &str, firmware: FirmwareVersion) {
        *self.device.write() = Some(device.clone());

        // Unlock then lock: the band vibrates to acknowledge the connection.
        if let Err(e) = device.unlock().and_then(|_| device.lock()) {
            warn!("Connect handshake failed: {}", e);
        }
        Self::enable_emg_stream(device);

        {
            let mut identity = self.identity.write();
            identity.name = Some(name.to_string());
            identity.firmware = Some(firmware.to_string());
        }
        self.connected.store(true, Ordering::Relaxed);

        info!(timestamp, device = name, firmware = %firmware, "armband connected");
    }

    fn on_disconnected(&self, timestamp: u64) {
        self.connected.store(false, Ordering::Relaxed);
        *self.device.write() = None;
        info!(timestamp, "armband disconnected");
    }

    fn on_arm_synced(&self, timestamp: u64, arm: Arm, x_direction: XDirection) {
        let mut identity = self.identity.write();
        identity.arm = Some(arm);
        identity.x_direction = Some(x_direction);
        debug!(timestamp, ?arm, ?x_direction, "arm synced");
    }

    fn on_arm_unsynced(&self, timestamp: u64, arm: Arm) {
        debug!(timestamp, ?arm, "arm unsynced");
    }

    fn on_locked(&self, _timestamp: u64) {
        self.locked.store(true, Ordering::Relaxed);
    }

    fn on_unlocked(&self, _timestamp: u64) {
        self.locked.store(false, Ordering::Relaxed);
    }

    fn on_pose(&self, _timestamp: u64, pose: Pose) {
        self.pose.store(pose.as_u8(), Ordering::Relaxed);
    }

    fn on_orientation(&self, timestamp: u64, orientation: Quaternion, gyroscope: Vector3, acceleration: Vector3) {
        self.store.push_motion(timestamp, orientation, gyroscope, acceleration);
    }

    fn on_emg(&self, timestamp: u64, emg: EmgFrame) {
        self.store.push_emg(timestamp, emg);
    }

    fn on_rssi(&self, timestamp: u64, rssi: i32) {
        // The radio reports attenuation; store it as a strength.
        self.store.push_rssi(timestamp, -rssi);
    }

    fn on_battery_level(&self, _timestamp: u64, level: u8) {
        self.battery_level.store(level, Ordering::Relaxed);
    }

    fn on_warmup_completed(&self, timestamp: u64, device: &DeviceHandle) {
        Self::enable_emg_stream(device);
        self.emg_enabled.store(true, Ordering::Relaxed);
        debug!(timestamp, "warm-up completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::traits::{Device, DeviceError};
    use crate::hal::types::VibrationType;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingDevice {
        commands: Mutex<Vec<String>>,
    }

    impl Device for RecordingDevice {
        fn vibrate(&self, kind: VibrationType) -> Result<(), DeviceError> {
            self.commands.lock().push(format!("vibrate:{:?}", kind));
            Ok(())
        }
        fn lock(&self) -> Result<(), DeviceError> {
            self.commands.lock().push("lock".into());
            Ok(())
        }
        fn unlock(&self) -> Result<(), DeviceError> {
            self.commands.lock().push("unlock".into());
            Ok(())
        }
        fn request_rssi(&self) -> Result<(), DeviceError> {
            self.commands.lock().push("rssi".into());
            Ok(())
        }
        fn stream_emg(&self, enabled: bool) -> Result<(), DeviceError> {
            self.commands.lock().push(format!("stream_emg:{}", enabled));
            Ok(())
        }
    }

    fn listener() -> MyoListener {
        MyoListener::new(8, 100).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let listener = listener();
        let state = listener.state();
        assert!(!state.connected);
        assert!(!state.locked);
        assert!(!state.warmed_up);
        assert_eq!(state.battery_level, 100);
        assert_eq!(state.pose, Pose::Rest);
        assert!(listener.device().is_none());
        assert!(listener.device_name().is_none());
    }

    #[test]
    fn test_connect_handshake() {
        let listener = listener();
        let recorder = Arc::new(RecordingDevice::default());
        let handle: DeviceHandle = recorder.clone();

        listener.on_connected(1, &handle, "Myo Test", FirmwareVersion([1, 5, 1970, 2]));

        assert!(listener.is_connected());
        assert_eq!(listener.device_name().as_deref(), Some("Myo Test"));
        assert_eq!(listener.firmware_version().as_deref(), Some("1.5.1970"));
        assert!(listener.device().is_some());
        assert_eq!(
            *recorder.commands.lock(),
            vec!["unlock".to_string(), "lock".to_string(), "stream_emg:true".to_string()]
        );
    }

    #[test]
    fn test_disconnect_keeps_samples() {
        let listener = listener();
        let handle: DeviceHandle = Arc::new(RecordingDevice::default());
        listener.on_connected(1, &handle, "Myo", FirmwareVersion([1, 0, 0, 0]));
        listener.on_emg(2, [1; 8]);
        listener.on_disconnected(3);

        assert!(!listener.is_connected());
        assert!(listener.device().is_none());
        assert_eq!(listener.get_emg_samples().len(), 1);
    }

    #[test]
    fn test_pose_last_write_wins() {
        let listener = listener();
        for pose in [Pose::Fist, Pose::WaveIn, Pose::Fist] {
            listener.on_pose(0, pose);
        }
        assert_eq!(listener.pose(), Pose::Fist);
    }

    #[test]
    fn test_lock_toggle_and_battery() {
        let listener = listener();
        listener.on_locked(0);
        assert!(listener.is_locked());
        listener.on_unlocked(1);
        assert!(!listener.is_locked());

        listener.on_battery_level(2, 57);
        assert_eq!(listener.battery_level(), 57);
    }

    #[test]
    fn test_rssi_is_negated() {
        let listener = listener();
        listener.on_rssi(1, -55);
        listener.on_rssi(2, 40);

        let values: Vec<i32> = listener.get_rssi_samples().iter().map(|s| s.payload).collect();
        assert_eq!(values, vec![55, -40]);
    }

    #[test]
    fn test_warmup_reenables_streaming() {
        let listener = listener();
        let recorder = Arc::new(RecordingDevice::default());
        let handle: DeviceHandle = recorder.clone();

        listener.on_warmup_completed(5, &handle);
        listener.on_warmup_completed(6, &handle);

        assert!(listener.is_warmed_up());
        assert_eq!(recorder.commands.lock().len(), 2);
    }

    #[test]
    fn test_arm_synced_records_side() {
        let listener = listener();
        listener.on_arm_synced(0, Arm::Right, XDirection::TowardWrist);
        assert_eq!(listener.arm(), Some(Arm::Right));
        assert_eq!(listener.x_direction(), Some(XDirection::TowardWrist));
    }

    #[test]
    fn test_orientation_event_fills_three_buffers() {
        let listener = listener();
        listener.on_orientation(
            7,
            Quaternion::IDENTITY,
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        );

        let batch = listener.read_batch();
        assert_eq!(batch.orientation.len(), 1);
        assert_eq!(batch.gyroscope[0].timestamp, 7);
        assert_eq!(batch.acceleration[0].payload, Vector3::new(0.0, 0.0, 1.0));
        assert!(batch.emg.is_empty());
    }
}
