// src/hal/events.rs
//! Hardware events and the listener contract that receives them

use crate::hal::traits::DeviceHandle;
use crate::hal::types::{Arm, EmgFrame, FirmwareVersion, Pose, Quaternion, Vector3, XDirection};
use std::fmt;

/// One event delivered by a [`crate::hal::Hub`]
///
/// Every event carries the device timestamp in microseconds.
#[derive(Clone)]
pub enum HubEvent {
    Paired { timestamp: u64 },
    Unpaired { timestamp: u64 },
    Connected {
        timestamp: u64,
        device: DeviceHandle,
        name: String,
        firmware: FirmwareVersion,
    },
    Disconnected { timestamp: u64 },
    ArmSynced {
        timestamp: u64,
        arm: Arm,
        x_direction: XDirection,
    },
    ArmUnsynced { timestamp: u64, arm: Arm },
    Locked { timestamp: u64 },
    Unlocked { timestamp: u64 },
    Pose { timestamp: u64, pose: Pose },
    /// Orientation, gyroscope and accelerometer share one timestamp
    Orientation {
        timestamp: u64,
        orientation: Quaternion,
        gyroscope: Vector3,
        acceleration: Vector3,
    },
    Emg { timestamp: u64, emg: EmgFrame },
    /// Raw attenuation as reported by the radio
    Rssi { timestamp: u64, rssi: i32 },
    BatteryLevel { timestamp: u64, level: u8 },
    WarmupCompleted { timestamp: u64, device: DeviceHandle },
}

impl HubEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            HubEvent::Paired { timestamp }
            | HubEvent::Unpaired { timestamp }
            | HubEvent::Connected { timestamp, .. }
            | HubEvent::Disconnected { timestamp }
            | HubEvent::ArmSynced { timestamp, .. }
            | HubEvent::ArmUnsynced { timestamp, .. }
            | HubEvent::Locked { timestamp }
            | HubEvent::Unlocked { timestamp }
            | HubEvent::Pose { timestamp, .. }
            | HubEvent::Orientation { timestamp, .. }
            | HubEvent::Emg { timestamp, .. }
            | HubEvent::Rssi { timestamp, .. }
            | HubEvent::BatteryLevel { timestamp, .. }
            | HubEvent::WarmupCompleted { timestamp, .. } => *timestamp,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HubEvent::Paired { .. } => "paired",
            HubEvent::Unpaired { .. } => "unpaired",
            HubEvent::Connected { .. } => "connected",
            HubEvent::Disconnected { .. } => "disconnected",
            HubEvent::ArmSynced { .. } => "arm_synced",
            HubEvent::ArmUnsynced { .. } => "arm_unsynced",
            HubEvent::Locked { .. } => "locked",
            HubEvent::Unlocked { .. } => "unlocked",
            HubEvent::Pose { .. } => "pose",
            HubEvent::Orientation { .. } => "orientation",
            HubEvent::Emg { .. } => "emg",
            HubEvent::Rssi { .. } => "rssi",
            HubEvent::BatteryLevel { .. } => "battery_level",
            HubEvent::WarmupCompleted { .. } => "warmup_completed",
        }
    }
}

impl fmt::Debug for HubEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubEvent")
            .field("kind", &self.kind())
            .field("timestamp", &self.timestamp())
            .finish()
    }
}

/// Receiver for hub events, one method per event kind
///
/// Every method defaults to a no-op, so implementors only override what they
/// record. Methods take `&self`: the hub may call them from its own thread
/// while another thread reads the listener.
pub trait DeviceListener: Send + Sync {
    /// Route an event to its handler
    fn on_event(&self, event: &HubEvent) {
        match event {
            HubEvent::Paired { timestamp } => self.on_paired(*timestamp),
            HubEvent::Unpaired { timestamp } => self.on_unpaired(*timestamp),
            HubEvent::Connected { timestamp, device, name, firmware } => {
                self.on_connected(*timestamp, device, name, *firmware)
            }
            HubEvent::Disconnected { timestamp } => self.on_disconnected(*timestamp),
            HubEvent::ArmSynced { timestamp, arm, x_direction } => {
                self.on_arm_synced(*timestamp, *arm, *x_direction)
            }
            HubEvent::ArmUnsynced { timestamp, arm } => self.on_arm_unsynced(*timestamp, *arm),
            HubEvent::Locked { timestamp } => self.on_locked(*timestamp),
            HubEvent::Unlocked { timestamp } => self.on_unlocked(*timestamp),
            HubEvent::Pose { timestamp, pose } => self.on_pose(*timestamp, *pose),
            HubEvent::Orientation { timestamp, orientation, gyroscope, acceleration } => {
                self.on_orientation(*timestamp, *orientation, *gyroscope, *acceleration)
            }
            HubEvent::Emg { timestamp, emg } => self.on_emg(*timestamp, *emg),
            HubEvent::Rssi { timestamp, rssi } => self.on_rssi(*timestamp, *rssi),
            HubEvent::BatteryLevel { timestamp, level } => self.on_battery_level(*timestamp, *level),
            HubEvent::WarmupCompleted { timestamp, device } => {
                self.on_warmup_completed(*timestamp, device)
            }
        }
    }

    fn on_paired(&self, _timestamp: u64) {}
    fn on_unpaired(&self, _timestamp: u64) {}
    fn on_connected(&self, _timestamp: u64, _device: &DeviceHandle, _name: &str, _firmware: FirmwareVersion) {}
    fn on_disconnected(&self, _timestamp: u64) {}
    fn on_arm_synced(&self, _timestamp: u64, _arm: Arm, _x_direction: XDirection) {}
    fn on_arm_unsynced(&self, _timestamp: u64, _arm: Arm) {}
    fn on_locked(&self, _timestamp: u64) {}
    fn on_unlocked(&self, _timestamp: u64) {}
    fn on_pose(&self, _timestamp: u64, _pose: Pose) {}
    fn on_orientation(&self, _timestamp: u64, _orientation: Quaternion, _gyroscope: Vector3, _acceleration: Vector3) {}
    fn on_emg(&self, _timestamp: u64, _emg: EmgFrame) {}
    fn on_rssi(&self, _timestamp: u64, _rssi: i32) {}
    fn on_battery_level(&self, _timestamp: u64, _level: u8) {}
    fn on_warmup_completed(&self, _timestamp: u64, _device: &DeviceHandle) {}
}
