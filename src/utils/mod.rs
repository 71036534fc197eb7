//! Common utility functions for the monitor

pub mod time;

pub use time::{
    current_timestamp_micros,
    sample_period_micros,
    MockTimeProvider,
    MonotonicTimeProvider,
    SystemTimeProvider,
    TimeProvider,
};
