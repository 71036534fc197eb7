// src/acquisition/sample_store.rs
//! Per-category bounded sample buffers behind their own locks
//!
//! Three lock groups keep unrelated categories from contending:
//! - motion: orientation, gyroscope and acceleration, written together
//! - EMG
//! - signal strength

use crate::acquisition::ring_buffer::{BoundedBuffer, BufferError, Sample};
use crate::config::constants::acquisition::{DEFAULT_QUEUE_SIZE, DEFAULT_RSSI_QUEUE_SIZE};
use crate::hal::types::{EmgFrame, Quaternion, Vector3};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type EmgSample = Sample<EmgFrame>;
pub type OrientationSample = Sample<Quaternion>;
pub type ImuSample = Sample<Vector3>;
/// Signal strength, already negated from the raw attenuation
pub type RssiSample = Sample<i32>;

/// Sample categories kept by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Emg,
    Orientation,
    Gyroscope,
    Acceleration,
    Rssi,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::Emg => "emg",
            Category::Orientation => "orientation",
            Category::Gyroscope => "gyroscope",
            Category::Acceleration => "acceleration",
            Category::Rssi => "rssi",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of any category, for category-generic access
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Emg(EmgFrame),
    Orientation(Quaternion),
    Gyroscope(Vector3),
    Acceleration(Vector3),
    Rssi(i32),
}

impl Payload {
    pub fn category(&self) -> Category {
        match self {
            Payload::Emg(_) => Category::Emg,
            Payload::Orientation(_) => Category::Orientation,
            Payload::Gyroscope(_) => Category::Gyroscope,
            Payload::Acceleration(_) => Category::Acceleration,
            Payload::Rssi(_) => Category::Rssi,
        }
    }
}

fn wrap<P: Copy>(samples: Vec<Sample<P>>, to_payload: fn(P) -> Payload) -> Vec<Sample<Payload>> {
    samples
        .into_iter()
        .map(|s| Sample::new(s.timestamp, to_payload(s.payload)))
        .collect()
}

struct MotionBuffers {
    orientation: BoundedBuffer<OrientationSample>,
    gyroscope: BoundedBuffer<ImuSample>,
    acceleration: BoundedBuffer<ImuSample>,
}

/// The three motion windows copied under a single lock
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionSnapshot {
    pub orientation: Vec<OrientationSample>,
    pub gyroscope: Vec<ImuSample>,
    pub acceleration: Vec<ImuSample>,
}

/// Samples ever pushed per plotted category, evicted ones included
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushCounts {
    pub emg: u64,
    pub orientation: u64,
    pub gyroscope: u64,
    pub acceleration: u64,
}

/// One poll's worth of copied samples
///
/// `pushed` is read under the same lock as the matching window, so the
/// last sample of each window is push number `pushed` of its category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBatch {
    pub emg: Vec<EmgSample>,
    pub orientation: Vec<OrientationSample>,
    pub gyroscope: Vec<ImuSample>,
    pub acceleration: Vec<ImuSample>,
    pub pushed: PushCounts,
}

impl SampleBatch {
    /// Batch whose windows hold every sample pushed so far
    pub fn from_samples(
        emg: Vec<EmgSample>,
        orientation: Vec<OrientationSample>,
        gyroscope: Vec<ImuSample>,
        acceleration: Vec<ImuSample>,
    ) -> Self {
        let pushed = PushCounts {
            emg: emg.len() as u64,
            orientation: orientation.len() as u64,
            gyroscope: gyroscope.len() as u64,
            acceleration: acceleration.len() as u64,
        };
        Self { emg, orientation, gyroscope, acceleration, pushed }
    }

    pub fn is_empty(&self) -> bool {
        self.emg.is_empty()
            && self.orientation.is_empty()
            && self.gyroscope.is_empty()
            && self.acceleration.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emg.len() + self.orientation.len() + self.gyroscope.len() + self.acceleration.len()
    }
}

/// Bounded recent-sample store shared by the event thread and the poll loop
pub struct SampleStore {
    motion: Mutex<MotionBuffers>,
    emg: Mutex<BoundedBuffer<EmgSample>>,
    rssi: Mutex<BoundedBuffer<RssiSample>>,
}

impl SampleStore {
    /// Create a store with `queue_size` slots per motion/EMG category and
    /// `rssi_queue_size` slots for signal strength
    pub fn new(queue_size: usize, rssi_queue_size: usize) -> Result<Self, BufferError> {
        Ok(Self {
            motion: Mutex::new(MotionBuffers {
                orientation: BoundedBuffer::new(queue_size)?,
                gyroscope: BoundedBuffer::new(queue_size)?,
                acceleration: BoundedBuffer::new(queue_size)?,
            }),
            emg: Mutex::new(BoundedBuffer::new(queue_size)?),
            rssi: Mutex::new(BoundedBuffer::new(rssi_queue_size)?),
        })
    }

    pub fn with_default_capacity() -> Result<Self, BufferError> {
        Self::new(DEFAULT_QUEUE_SIZE, DEFAULT_RSSI_QUEUE_SIZE)
    }

    /// Push one motion reading into all three motion buffers atomically
    pub fn push_motion(
        &self,
        timestamp: u64,
        orientation: Quaternion,
        gyroscope: Vector3,
        acceleration: Vector3,
    ) {
        let mut motion = self.motion.lock();
        motion.orientation.push(Sample::new(timestamp, orientation));
        motion.gyroscope.push(Sample::new(timestamp, gyroscope));
        motion.acceleration.push(Sample::new(timestamp, acceleration));
    }

    pub fn push_emg(&self, timestamp: u64, emg: EmgFrame) {
        self.emg.lock().push(Sample::new(timestamp, emg));
    }

    pub fn push_rssi(&self, timestamp: u64, strength: i32) {
        self.rssi.lock().push(Sample::new(timestamp, strength));
    }

    pub fn emg_samples(&self) -> Vec<EmgSample> {
        self.emg.lock().snapshot()
    }

    pub fn orientation_samples(&self) -> Vec<OrientationSample> {
        self.motion.lock().orientation.snapshot()
    }

    pub fn gyroscope_samples(&self) -> Vec<ImuSample> {
        self.motion.lock().gyroscope.snapshot()
    }

    pub fn acceleration_samples(&self) -> Vec<ImuSample> {
        self.motion.lock().acceleration.snapshot()
    }

    pub fn rssi_samples(&self) -> Vec<RssiSample> {
        self.rssi.lock().snapshot()
    }

    /// All three motion windows from the same instant
    pub fn motion_samples(&self) -> MotionSnapshot {
        let motion = self.motion.lock();
        MotionSnapshot {
            orientation: motion.orientation.snapshot(),
            gyroscope: motion.gyroscope.snapshot(),
            acceleration: motion.acceleration.snapshot(),
        }
    }

    /// Push one sample into the buffer of its payload's category
    ///
    /// A single motion component only touches its own buffer; use
    /// [`SampleStore::push_motion`] to keep the three aligned.
    pub fn push(&self, timestamp: u64, payload: Payload) {
        match payload {
            Payload::Emg(frame) => self.push_emg(timestamp, frame),
            Payload::Orientation(q) => self.motion.lock().orientation.push(Sample::new(timestamp, q)),
            Payload::Gyroscope(v) => self.motion.lock().gyroscope.push(Sample::new(timestamp, v)),
            Payload::Acceleration(v) => self.motion.lock().acceleration.push(Sample::new(timestamp, v)),
            Payload::Rssi(strength) => self.push_rssi(timestamp, strength),
        }
    }

    /// Copy of one category's window, oldest first; nothing is consumed
    pub fn drain(&self, category: Category) -> Vec<Sample<Payload>> {
        match category {
            Category::Emg => wrap(self.emg_samples(), Payload::Emg),
            Category::Orientation => wrap(self.orientation_samples(), Payload::Orientation),
            Category::Gyroscope => wrap(self.gyroscope_samples(), Payload::Gyroscope),
            Category::Acceleration => wrap(self.acceleration_samples(), Payload::Acceleration),
            Category::Rssi => wrap(self.rssi_samples(), Payload::Rssi),
        }
    }

    /// Copy out the four plotted windows with their push counts
    pub fn read_batch(&self) -> SampleBatch {
        let (emg, emg_pushed) = {
            let emg = self.emg.lock();
            (emg.snapshot(), emg.total_pushed())
        };
        let motion = self.motion.lock();

        SampleBatch {
            emg,
            orientation: motion.orientation.snapshot(),
            gyroscope: motion.gyroscope.snapshot(),
            acceleration: motion.acceleration.snapshot(),
            pushed: PushCounts {
                emg: emg_pushed,
                orientation: motion.orientation.total_pushed(),
                gyroscope: motion.gyroscope.total_pushed(),
                acceleration: motion.acceleration.total_pushed(),
            },
        }
    }

    /// Number of samples currently held for `category`
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Emg => self.emg.lock().len(),
            Category::Orientation => self.motion.lock().orientation.len(),
            Category::Gyroscope => self.motion.lock().gyroscope.len(),
            Category::Acceleration => self.motion.lock().acceleration.len(),
            Category::Rssi => self.rssi.lock().len(),
        }
    }

    pub fn capacity(&self, category: Category) -> usize {
        match category {
            Category::Emg => self.emg.lock().capacity(),
            Category::Orientation => self.motion.lock().orientation.capacity(),
            Category::Gyroscope => self.motion.lock().gyroscope.capacity(),
            Category::Acceleration => self.motion.lock().acceleration.capacity(),
            Category::Rssi => self.rssi.lock().capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quat(v: f32) -> Quaternion {
        Quaternion::new(v, v, v, 1.0)
    }

    #[test]
    fn test_default_capacities() {
        let store = SampleStore::with_default_capacity().unwrap();
        assert_eq!(store.capacity(Category::Emg), 8);
        assert_eq!(store.capacity(Category::Orientation), 8);
        assert_eq!(store.capacity(Category::Gyroscope), 8);
        assert_eq!(store.capacity(Category::Acceleration), 8);
        assert_eq!(store.capacity(Category::Rssi), 100);
    }

    #[test]
    fn test_emg_window_keeps_last_eight() {
        let store = SampleStore::with_default_capacity().unwrap();
        for ts in 1..=9u64 {
            store.push_emg(ts, [ts as i8; 8]);
        }

        let samples = store.emg_samples();
        let timestamps: Vec<u64> = samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, (2..=9).collect::<Vec<_>>());
        assert_eq!(samples[0].payload, [2i8; 8]);
    }

    #[test]
    fn test_motion_push_shares_timestamp() {
        let store = SampleStore::with_default_capacity().unwrap();
        store.push_motion(10, quat(0.1), Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0));
        store.push_motion(20, quat(0.2), Vector3::new(4.0, 5.0, 6.0), Vector3::new(0.0, 1.0, 0.0));

        let motion = store.motion_samples();
        assert_eq!(motion.orientation.len(), 2);
        for i in 0..2 {
            assert_eq!(motion.orientation[i].timestamp, motion.gyroscope[i].timestamp);
            assert_eq!(motion.gyroscope[i].timestamp, motion.acceleration[i].timestamp);
        }
        assert_eq!(store.gyroscope_samples()[1].payload, Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_categories_are_independent() {
        let store = SampleStore::new(2, 3).unwrap();
        store.push_emg(1, [0; 8]);
        store.push_rssi(1, 40);

        assert_eq!(store.len(Category::Emg), 1);
        assert_eq!(store.len(Category::Rssi), 1);
        assert_eq!(store.len(Category::Orientation), 0);
        assert!(store.acceleration_samples().is_empty());
    }

    #[test]
    fn test_generic_push_and_drain() {
        let store = SampleStore::new(8, 100).unwrap();
        for ts in 1..=9u64 {
            store.push(ts, Payload::Emg([ts as i8; 8]));
        }
        store.push(3, Payload::Rssi(61));
        store.push(4, Payload::Gyroscope(Vector3::new(1.0, 0.0, 0.0)));

        let emg = store.drain(Category::Emg);
        assert_eq!(emg.len(), 8);
        assert_eq!(emg[0], Sample::new(2, Payload::Emg([2; 8])));
        assert_eq!(store.drain(Category::Emg), emg);

        assert_eq!(store.drain(Category::Rssi), vec![Sample::new(3, Payload::Rssi(61))]);
        assert_eq!(store.drain(Category::Gyroscope)[0].payload.category(), Category::Gyroscope);
        assert!(store.drain(Category::Orientation).is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(SampleStore::new(0, 100).is_err());
        assert!(SampleStore::new(8, 0).is_err());
    }

    #[test]
    fn test_batch_len() {
        let batch = SampleBatch {
            emg: vec![Sample::new(1, [0; 8])],
            orientation: vec![Sample::new(1, quat(0.0))],
            ..Default::default()
        };
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert!(SampleBatch::default().is_empty());
    }

    #[test]
    fn test_read_batch_counts_evicted_pushes() {
        let store = SampleStore::new(2, 3).unwrap();
        for ts in 1..=5u64 {
            store.push_emg(ts, [0; 8]);
        }
        store.push_motion(9, quat(0.0), Vector3::default(), Vector3::default());
        store.push(10, Payload::Gyroscope(Vector3::default()));

        let batch = store.read_batch();
        assert_eq!(batch.emg.len(), 2);
        assert_eq!(batch.pushed.emg, 5);
        assert_eq!(batch.pushed.orientation, 1);
        assert_eq!(batch.pushed.gyroscope, 2);
        assert_eq!(batch.pushed.acceleration, 1);
    }
}
