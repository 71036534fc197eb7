//! Event generation for the simulated armband
//! Location: src/hal/simulation/signal_generator.rs

use crate::config::constants::simulation::BATTERY_DRAIN_MS_PER_PERCENT;
use crate::hal::events::HubEvent;
use crate::hal::simulator::{SimulatedDevice, SimulatorConfig};
use crate::hal::traits::DeviceHandle;
use crate::hal::types::{
    Arm, EmgFrame, FirmwareVersion, Pose, Quaternion, Vector3, XDirection, EMG_CHANNEL_COUNT,
};
use crate::utils::time::sample_period_micros;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;
use std::sync::Arc;

/// Wrist rotation rate while the arm is moving, deg/s
const ROTATION_RATE_DPS: f32 = 30.0;
/// Carrier frequency of the synthetic EMG bursts
const EMG_CARRIER_HZ: f32 = 45.0;
const REST_ACTIVATION: f32 = 0.1;
const NOISE_FRACTION: f32 = 0.08;

/// Per-electrode weights for each pose, electrode 0 first
fn channel_weights(pose: Pose) -> [f32; EMG_CHANNEL_COUNT] {
    match pose {
        Pose::Rest => [REST_ACTIVATION; EMG_CHANNEL_COUNT],
        Pose::Fist => [0.9, 1.0, 0.9, 0.8, 0.8, 0.9, 1.0, 0.9],
        Pose::WaveIn => [1.0, 0.8, 0.3, 0.2, 0.2, 0.3, 0.7, 1.0],
        Pose::WaveOut => [0.2, 0.4, 0.9, 1.0, 1.0, 0.8, 0.3, 0.2],
        Pose::FingersSpread => [0.5, 0.9, 1.0, 0.7, 0.4, 0.5, 0.8, 0.6],
        Pose::DoubleTap => [0.6, 0.6, 0.5, 0.4, 0.4, 0.5, 0.6, 0.6],
    }
}

/// Produces the event stream of one simulated armband
///
/// Deterministic for a given seed and sequence of `advance` times.
pub struct MyoSignalGenerator {
    config: SimulatorConfig,
    device: Arc<SimulatedDevice>,
    rng: StdRng,

    started_at: Option<u64>,
    warmup_sent: bool,
    next_emg: u64,
    next_imu: u64,
    next_pose: u64,
    next_battery: u64,

    emg_period: u64,
    imu_period: u64,
    battery: u8,
    pose: Pose,
    yaw_deg: f32,
}

impl MyoSignalGenerator {
    pub fn new(config: SimulatorConfig, device: Arc<SimulatedDevice>) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let emg_period = sample_period_micros(config.emg_rate_hz).max(1);
        let imu_period = sample_period_micros(config.imu_rate_hz).max(1);
        let battery = config.battery_start;

        Self {
            config,
            device,
            rng,
            started_at: None,
            warmup_sent: false,
            next_emg: 0,
            next_imu: 0,
            next_pose: 0,
            next_battery: 0,
            emg_period,
            imu_period,
            battery,
            pose: Pose::Rest,
            yaw_deg: 0.0,
        }
    }

    pub fn current_pose(&self) -> Pose {
        self.pose
    }

    /// Emit every event due up to `now` (microseconds)
    pub fn advance(&mut self, now: u64) -> Vec<HubEvent> {
        let mut events = Vec::new();

        let start = match self.started_at {
            Some(start) => start,
            None => {
                self.announce(now, &mut events);
                now
            }
        };

        if !self.device.is_connected() {
            return events;
        }

        while self.next_imu <= now {
            let timestamp = self.next_imu;
            events.push(self.motion_event(timestamp));
            self.next_imu += self.imu_period;
        }

        if self.device.is_streaming_emg() {
            while self.next_emg <= now {
                let timestamp = self.next_emg;
                events.push(HubEvent::Emg { timestamp, emg: self.emg_frame(timestamp) });
                self.next_emg += self.emg_period;
            }
        } else {
            // Nothing is sampled while the stream is off.
            self.next_emg = now + self.emg_period;
        }

        if !self.warmup_sent && now >= start + self.config.warmup_ms * 1000 {
            self.warmup_sent = true;
            events.push(HubEvent::WarmupCompleted { timestamp: now, device: self.handle() });
        }

        if now >= self.next_pose {
            self.pose = self.next_pose_after(self.pose);
            events.push(HubEvent::Pose { timestamp: now, pose: self.pose });
            self.next_pose = now + self.config.pose_period_ms * 1000;
        }

        if now >= self.next_battery {
            self.battery = self.battery.saturating_sub(1);
            events.push(HubEvent::BatteryLevel { timestamp: now, level: self.battery });
            self.next_battery = now + BATTERY_DRAIN_MS_PER_PERCENT * 1000;
        }

        events
    }

    fn handle(&self) -> DeviceHandle {
        self.device.clone()
    }

    fn announce(&mut self, now: u64, events: &mut Vec<HubEvent>) {
        self.started_at = Some(now);
        self.next_imu = now;
        self.next_emg = now;
        self.next_pose = now + self.config.pose_period_ms * 1000;
        self.next_battery = now + BATTERY_DRAIN_MS_PER_PERCENT * 1000;

        events.push(HubEvent::Paired { timestamp: now });
        events.push(HubEvent::Connected {
            timestamp: now,
            device: self.handle(),
            name: self.config.device_name.clone(),
            firmware: FirmwareVersion(self.config.firmware_version),
        });
        events.push(HubEvent::ArmSynced {
            timestamp: now,
            arm: Arm::Right,
            x_direction: XDirection::TowardWrist,
        });
        events.push(HubEvent::BatteryLevel { timestamp: now, level: self.battery });
    }

    /// Alternate between rest and a random active pose
    fn next_pose_after(&mut self, current: Pose) -> Pose {
        if current != Pose::Rest {
            return Pose::Rest;
        }
        let active = &Pose::ALL[1..];
        active[self.rng.gen_range(0..active.len())]
    }

    fn emg_frame(&mut self, timestamp: u64) -> EmgFrame {
        let weights = channel_weights(self.pose);
        let t = timestamp as f32 / 1_000_000.0;
        let amplitude = self.config.emg_amplitude;
        let mut frame = [0i8; EMG_CHANNEL_COUNT];

        for (channel, value) in frame.iter_mut().enumerate() {
            let phase = 2.0 * PI * EMG_CARRIER_HZ * t + channel as f32 * PI / 4.0;
            let noise = self.rng.gen_range(-1.0f32..1.0) * amplitude * NOISE_FRACTION;
            let signal = amplitude * weights[channel] * phase.sin() + noise;
            *value = signal.round().clamp(i8::MIN as f32, i8::MAX as f32) as i8;
        }
        frame
    }

    fn motion_event(&mut self, timestamp: u64) -> HubEvent {
        let dt = self.imu_period as f32 / 1_000_000.0;
        let rate = if self.pose == Pose::Rest { 0.0 } else { ROTATION_RATE_DPS };
        self.yaw_deg = (self.yaw_deg + rate * dt) % 360.0;

        let half = self.yaw_deg.to_radians() / 2.0;
        let orientation = Quaternion::new(0.0, 0.0, half.sin(), half.cos());
        let gyroscope = Vector3::new(
            self.rng.gen_range(-0.5f32..0.5),
            self.rng.gen_range(-0.5f32..0.5),
            rate + self.rng.gen_range(-0.5f32..0.5),
        );
        let acceleration = Vector3::new(
            self.rng.gen_range(-0.02f32..0.02),
            self.rng.gen_range(-0.02f32..0.02),
            1.0 + self.rng.gen_range(-0.02f32..0.02),
        );

        HubEvent::Orientation { timestamp, orientation, gyroscope, acceleration }
    }
}
