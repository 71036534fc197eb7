// src/hal/types.rs
//! Core types reported by the armband

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of EMG electrodes on the armband
pub const EMG_CHANNEL_COUNT: usize = 8;

/// One EMG reading, one signed 8-bit value per electrode
pub type EmgFrame = [i8; EMG_CHANNEL_COUNT];

/// Gesture reported by the onboard recognizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Pose {
    #[default]
    Rest = 0,
    Fist = 1,
    WaveIn = 2,
    WaveOut = 3,
    FingersSpread = 4,
    DoubleTap = 5,
}

impl Pose {
    pub const ALL: [Pose; 6] = [
        Pose::Rest,
        Pose::Fist,
        Pose::WaveIn,
        Pose::WaveOut,
        Pose::FingersSpread,
        Pose::DoubleTap,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Pose::Rest => "rest",
            Pose::Fist => "fist",
            Pose::WaveIn => "wave_in",
            Pose::WaveOut => "wave_out",
            Pose::FingersSpread => "fingers_spread",
            Pose::DoubleTap => "double_tap",
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which arm the band was synced on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arm {
    Left,
    Right,
    Unknown,
}

/// Orientation of the band's +x axis on the arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XDirection {
    TowardWrist,
    TowardElbow,
    Unknown,
}

/// Vibration lengths the band supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VibrationType {
    Short,
    Medium,
    Long,
}

/// Orientation as a unit quaternion
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// Three-axis reading (gyroscope in deg/s, accelerometer in g)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Firmware version as reported on connect: major, minor, patch, hardware revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareVersion(pub [u32; 4]);

impl fmt::Display for FirmwareVersion {
    // The hardware revision is not part of the user-facing version.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, _] = self.0;
        write!(f, "{}.{}.{}", major, minor, patch)
    }
}

/// Identity captured from the connect event
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceIdentity {
    pub name: Option<String>,
    pub firmware: Option<String>,
    pub arm: Option<Arm>,
    pub x_direction: Option<XDirection>,
}
