// src/utils/time.rs
//! Timestamp helpers shared by the simulator and the polling driver

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Time provider trait for dependency injection and testing
///
/// Device timestamps are microseconds, matching what the armband reports.
pub trait TimeProvider: Send + Sync {
    fn now_micros(&self) -> u64;
    fn now_millis(&self) -> u64 {
        self.now_micros() / 1000
    }
}

/// System time provider using the wall clock
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_micros(&self) -> u64 {
        current_timestamp_micros()
    }
}

/// Monotonic provider anchored to the wall clock at construction
///
/// Timestamps never go backwards even if the system clock is adjusted.
pub struct MonotonicTimeProvider {
    anchor_micros: u64,
    start: Instant,
}

impl MonotonicTimeProvider {
    pub fn new() -> Self {
        Self {
            anchor_micros: current_timestamp_micros(),
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for MonotonicTimeProvider {
    fn now_micros(&self) -> u64 {
        self.anchor_micros + self.start.elapsed().as_micros() as u64
    }
}

/// Mock time provider for deterministic testing
pub struct MockTimeProvider {
    current_time: AtomicU64,
}

impl MockTimeProvider {
    pub fn new(initial_time_micros: u64) -> Self {
        Self {
            current_time: AtomicU64::new(initial_time_micros),
        }
    }

    pub fn advance_by(&self, micros: u64) {
        self.current_time.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn set_time(&self, micros: u64) {
        self.current_time.store(micros, Ordering::Relaxed);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_micros(&self) -> u64 {
        self.current_time.load(Ordering::Relaxed)
    }
}

/// Microseconds since the Unix epoch, or 0 if the clock is before it
pub fn current_timestamp_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}

/// Sample period in microseconds for a rate in Hz
pub fn sample_period_micros(rate_hz: u32) -> u64 {
    if rate_hz == 0 {
        return 0;
    }
    1_000_000 / rate_hz as u64
}
