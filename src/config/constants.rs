// src/config/constants.rs
//! System-wide configuration constants

/// Sample buffering
pub mod acquisition {
    /// Slots per EMG and motion buffer
    pub const DEFAULT_QUEUE_SIZE: usize = 8;
    /// Slots for the signal strength buffer
    pub const DEFAULT_RSSI_QUEUE_SIZE: usize = 100;
}

/// Poll loop and charting
pub mod display {
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 20;
    pub const DEFAULT_PUMP_TIMEOUT_MS: u64 = 20;
    /// Points kept per plotted channel
    pub const DEFAULT_PLOT_POINTS: usize = 1000;
    /// Status line cadence, in ticks (one per second at 20 ms)
    pub const DEFAULT_STATUS_EVERY_TICKS: u64 = 50;

    pub const EMG_Y_RANGE: (f64, f64) = (-128.0, 128.0);
    pub const RSSI_Y_RANGE: (f64, f64) = (0.0, 100.0);

    pub const LABEL_CONNECTED: &str = "CONNECTED";
    pub const LABEL_DISCONNECTED: &str = "DISCONNECTED";
    pub const LABEL_LOCKED: &str = "isLOCKED";
    pub const LABEL_UNLOCKED: &str = "isUNLOCKED";
}

/// Session export
pub mod export {
    pub const DEFAULT_SAVE_DIR: &str = "data";
    pub const DEFAULT_FILE_NAME: &str = "myo_session.csv";
}

/// Simulated armband
pub mod simulation {
    pub const DEFAULT_DEVICE_NAME: &str = "Simulated Myo";
    pub const DEFAULT_FIRMWARE_VERSION: [u32; 4] = [1, 5, 1970, 2];
    /// Native EMG stream rate of the armband
    pub const DEFAULT_EMG_RATE_HZ: u32 = 200;
    /// Native IMU stream rate of the armband
    pub const DEFAULT_IMU_RATE_HZ: u32 = 50;
    pub const DEFAULT_WARMUP_MS: u64 = 2000;
    pub const DEFAULT_BATTERY_START: u8 = 100;
    pub const DEFAULT_POSE_PERIOD_MS: u64 = 1500;
    pub const DEFAULT_RSSI_RAW: i32 = -55;
    pub const DEFAULT_EMG_AMPLITUDE: f32 = 60.0;
    pub const DEFAULT_SEED: u64 = 0x6d79_6f00;
    /// One battery percent lost per this many milliseconds
    pub const BATTERY_DRAIN_MS_PER_PERCENT: u64 = 60_000;
    pub const GENERATOR_TICK_MS: u64 = 5;
}

/// Configuration discovery
pub mod paths {
    pub const LOCAL_CONFIG_FILE: &str = "myo_monitor.toml";
    pub const USER_CONFIG_DIR: &str = ".config/myo-monitor";
    pub const USER_CONFIG_FILE: &str = "config.toml";
    pub const ENV_PREFIX: &str = "MYO_";
}
