// src/monitor/display.rs
//! Render-ready view of the monitor state
//!
//! A [`DisplaySnapshot`] holds everything a front end draws on one frame:
//! the title and status labels, pose indicators, the most recent chart
//! points per channel and the fixed chart ranges. Rendering itself sits
//! behind [`Renderer`].

use crate::acquisition::listener::DeviceState;
use crate::acquisition::sample_store::RssiSample;
use crate::config::constants::display::{
    EMG_Y_RANGE, LABEL_CONNECTED, LABEL_DISCONNECTED, LABEL_LOCKED, LABEL_UNLOCKED, RSSI_Y_RANGE,
};
use crate::hal::types::{Pose, EMG_CHANNEL_COUNT};
use crate::monitor::history::SessionHistory;
use serde::Serialize;
use tracing::info;

/// Title shown when the band has not reported a name
pub const DEFAULT_TITLE: &str = "Myo";

/// One lamp per gesture; only the active pose is lit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoseIndicators {
    pub fist: bool,
    pub wave_in: bool,
    pub wave_out: bool,
    pub fingers_spread: bool,
}

impl PoseIndicators {
    /// Rest and double tap light nothing
    pub fn for_pose(pose: Pose) -> Self {
        Self {
            fist: pose == Pose::Fist,
            wave_in: pose == Pose::WaveIn,
            wave_out: pose == Pose::WaveOut,
            fingers_spread: pose == Pose::FingersSpread,
        }
    }

    pub fn any(&self) -> bool {
        self.fist || self.wave_in || self.wave_out || self.fingers_spread
    }
}

/// Everything drawn on one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    pub title: String,
    pub connection_label: &'static str,
    pub lock_label: &'static str,
    pub battery_level: u8,
    pub pose: Pose,
    pub pose_indicators: PoseIndicators,
    /// Per electrode, oldest point first
    pub emg: Vec<Vec<f64>>,
    /// Quaternion x, y, z
    pub orientation: Vec<Vec<f64>>,
    pub gyroscope: Vec<Vec<f64>>,
    pub acceleration: Vec<Vec<f64>>,
    pub rssi: Vec<f64>,
    pub emg_y_range: (f64, f64),
    pub rssi_y_range: (f64, f64),
}

impl DisplaySnapshot {
    pub fn build(
        state: &DeviceState,
        history: &SessionHistory,
        rssi: &[RssiSample],
        plot_points: usize,
    ) -> Self {
        let title = match state.identity.name.as_deref() {
            Some(name) => format!("{} : {}", DEFAULT_TITLE, name),
            None => DEFAULT_TITLE.to_string(),
        };

        let rssi_start = rssi.len().saturating_sub(plot_points);

        Self {
            title,
            connection_label: if state.connected { LABEL_CONNECTED } else { LABEL_DISCONNECTED },
            lock_label: if state.locked { LABEL_LOCKED } else { LABEL_UNLOCKED },
            battery_level: state.battery_level,
            pose: state.pose,
            pose_indicators: PoseIndicators::for_pose(state.pose),
            emg: (0..EMG_CHANNEL_COUNT)
                .map(|ch| history.emg_channel(ch, plot_points))
                .collect(),
            orientation: (0..3).map(|axis| history.orientation_axis(axis, plot_points)).collect(),
            gyroscope: (0..3).map(|axis| history.gyroscope_axis(axis, plot_points)).collect(),
            acceleration: (0..3)
                .map(|axis| history.acceleration_axis(axis, plot_points))
                .collect(),
            rssi: rssi[rssi_start..].iter().map(|s| s.payload as f64).collect(),
            emg_y_range: EMG_Y_RANGE,
            rssi_y_range: RSSI_Y_RANGE,
        }
    }

    /// Latest value per EMG electrode, zero where nothing was recorded
    pub fn latest_emg(&self) -> [f64; EMG_CHANNEL_COUNT] {
        let mut latest = [0.0; EMG_CHANNEL_COUNT];
        for (slot, channel) in latest.iter_mut().zip(&self.emg) {
            *slot = channel.last().copied().unwrap_or(0.0);
        }
        latest
    }

    pub fn status_line(&self) -> String {
        format!(
            "{} | {} | {} | battery {}% | pose {}",
            self.title, self.connection_label, self.lock_label, self.battery_level, self.pose
        )
    }
}

/// Consumer of display frames
pub trait Renderer {
    fn render(&mut self, snapshot: &DisplaySnapshot);
}

/// Headless renderer that logs a status line every `every` frames
#[derive(Debug)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1), frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &DisplaySnapshot) {
        self.frames += 1;
        if self.frames % self.every != 0 {
            return;
        }
        info!(
            title = %snapshot.title,
            connection = snapshot.connection_label,
            lock = snapshot.lock_label,
            battery = snapshot.battery_level,
            pose = %snapshot.pose,
            emg = ?snapshot.latest_emg(),
            rssi = ?snapshot.rssi.last(),
            "monitor status"
        );
    }
}
