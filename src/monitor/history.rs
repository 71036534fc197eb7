// src/monitor/history.rs
//! Unbounded session history fed from the live windows

use crate::acquisition::ring_buffer::Sample;
use crate::acquisition::sample_store::{
    Category, EmgSample, ImuSample, OrientationSample, PushCounts, SampleBatch,
};
use crate::hal::types::EMG_CHANNEL_COUNT;
use tracing::warn;

/// Every sample seen since the session started, per plotted category
///
/// Live windows overlap from one poll to the next. Each batch carries the
/// number of pushes behind its windows, so `append` takes exactly the
/// pushes it has not recorded yet from the tail of each window. Samples
/// evicted before any poll saw them are counted in [`SessionHistory::missed`].
/// Signal strength is plotted from the live buffer and never recorded here.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    emg: Vec<EmgSample>,
    orientation: Vec<OrientationSample>,
    gyroscope: Vec<ImuSample>,
    acceleration: Vec<ImuSample>,
    recorded: PushCounts,
    missed: u64,
}

/// Append the unrecorded tail of `window`; returns (added, missed)
fn append_unrecorded<P: Clone>(
    history: &mut Vec<Sample<P>>,
    recorded: &mut u64,
    window: &[Sample<P>],
    pushed: u64,
) -> (usize, u64) {
    let fresh = pushed.saturating_sub(*recorded);
    *recorded = (*recorded).max(pushed);

    let take = usize::try_from(fresh).unwrap_or(usize::MAX).min(window.len());
    history.extend_from_slice(&window[window.len() - take..]);
    (take, fresh - take as u64)
}

/// Last `n` values of one component, oldest first
fn tail_component<P>(samples: &[Sample<P>], n: usize, component: impl Fn(&P) -> f64) -> Vec<f64> {
    let start = samples.len().saturating_sub(n);
    samples[start..].iter().map(|s| component(&s.payload)).collect()
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the new part of a polled batch; returns how many samples were added
    pub fn append(&mut self, batch: &SampleBatch) -> usize {
        let results = [
            append_unrecorded(&mut self.emg, &mut self.recorded.emg, &batch.emg, batch.pushed.emg),
            append_unrecorded(
                &mut self.orientation,
                &mut self.recorded.orientation,
                &batch.orientation,
                batch.pushed.orientation,
            ),
            append_unrecorded(
                &mut self.gyroscope,
                &mut self.recorded.gyroscope,
                &batch.gyroscope,
                batch.pushed.gyroscope,
            ),
            append_unrecorded(
                &mut self.acceleration,
                &mut self.recorded.acceleration,
                &batch.acceleration,
                batch.pushed.acceleration,
            ),
        ];

        let missed: u64 = results.iter().map(|(_, missed)| missed).sum();
        if missed > 0 {
            warn!(missed, "samples evicted before they were polled");
            self.missed += missed;
        }
        results.iter().map(|(added, _)| added).sum()
    }

    /// Samples pushed but overwritten before any poll copied them
    pub fn missed(&self) -> u64 {
        self.missed
    }

    pub fn emg(&self) -> &[EmgSample] {
        &self.emg
    }

    pub fn orientation(&self) -> &[OrientationSample] {
        &self.orientation
    }

    pub fn gyroscope(&self) -> &[ImuSample] {
        &self.gyroscope
    }

    pub fn acceleration(&self) -> &[ImuSample] {
        &self.acceleration
    }

    /// Samples recorded for `category`; `None` for signal strength, which
    /// is not part of the history
    pub fn len(&self, category: Category) -> Option<usize> {
        match category {
            Category::Emg => Some(self.emg.len()),
            Category::Orientation => Some(self.orientation.len()),
            Category::Gyroscope => Some(self.gyroscope.len()),
            Category::Acceleration => Some(self.acceleration.len()),
            Category::Rssi => None,
        }
    }

    pub fn total_len(&self) -> usize {
        self.emg.len() + self.orientation.len() + self.gyroscope.len() + self.acceleration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Last `n` values of one EMG electrode
    pub fn emg_channel(&self, channel: usize, n: usize) -> Vec<f64> {
        if channel >= EMG_CHANNEL_COUNT {
            return Vec::new();
        }
        tail_component(&self.emg, n, |frame| frame[channel] as f64)
    }

    /// Last `n` values of one quaternion component (x, y, z, w)
    pub fn orientation_axis(&self, axis: usize, n: usize) -> Vec<f64> {
        if axis >= 4 {
            return Vec::new();
        }
        tail_component(&self.orientation, n, |q| q.to_array()[axis] as f64)
    }

    pub fn gyroscope_axis(&self, axis: usize, n: usize) -> Vec<f64> {
        if axis >= 3 {
            return Vec::new();
        }
        tail_component(&self.gyroscope, n, |v| v.to_array()[axis] as f64)
    }

    pub fn acceleration_axis(&self, axis: usize, n: usize) -> Vec<f64> {
        if axis >= 3 {
            return Vec::new();
        }
        tail_component(&self.acceleration, n, |v| v.to_array()[axis] as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::types::{Quaternion, Vector3};

    fn emg(ts: u64, v: i8) -> EmgSample {
        Sample::new(ts, [v; 8])
    }

    /// EMG window as the store would return it after `pushed` pushes
    fn emg_window(samples: Vec<EmgSample>, pushed: u64) -> SampleBatch {
        SampleBatch {
            emg: samples,
            pushed: PushCounts { emg: pushed, ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn test_overlapping_windows_recorded_once() {
        let mut history = SessionHistory::new();
        let first = emg_window(vec![emg(1, 1), emg(2, 2), emg(3, 3)], 3);
        let second = emg_window(vec![emg(2, 2), emg(3, 3), emg(4, 4)], 4);

        assert_eq!(history.append(&first), 3);
        assert_eq!(history.append(&second), 1);
        assert_eq!(history.append(&second), 0);

        let timestamps: Vec<u64> = history.emg().iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_identical_consecutive_samples_both_recorded() {
        let mut history = SessionHistory::new();
        let sample = Sample::new(10, [0; 8]);

        history.append(&emg_window(vec![sample], 1));
        history.append(&emg_window(vec![sample, sample], 2));

        assert_eq!(history.len(Category::Emg), Some(2));
        assert_eq!(history.emg(), &[sample, sample]);
    }

    #[test]
    fn test_evicted_samples_counted_as_missed() {
        let mut history = SessionHistory::new();
        history.append(&emg_window(vec![emg(1, 1), emg(2, 2)], 2));
        // Pushes 3..=4 were overwritten before this poll
        history.append(&emg_window(vec![emg(5, 5), emg(6, 6)], 6));

        assert_eq!(history.len(Category::Emg), Some(4));
        assert_eq!(history.missed(), 2);
    }

    #[test]
    fn test_rssi_not_recorded() {
        let history = SessionHistory::new();
        assert_eq!(history.len(Category::Rssi), None);
        assert_eq!(history.len(Category::Gyroscope), Some(0));
    }

    #[test]
    fn test_store_batches_feed_history_exactly() {
        use crate::acquisition::sample_store::SampleStore;

        let store = SampleStore::new(8, 100).unwrap();
        let mut history = SessionHistory::new();
        for ts in 0..30u64 {
            // Same payload and timestamp pairs repeat
            store.push_emg(ts / 2, [1; 8]);
            if ts % 3 == 0 {
                history.append(&store.read_batch());
            }
        }
        history.append(&store.read_batch());

        assert_eq!(history.len(Category::Emg), Some(30));
        assert_eq!(history.missed(), 0);
    }

    #[test]
    fn test_channel_tail() {
        let mut history = SessionHistory::new();
        let batch = SampleBatch::from_samples(
            (1..=5).map(|i| emg(i, i as i8)).collect(),
            vec![Sample::new(1, Quaternion::IDENTITY)],
            vec![Sample::new(1, Vector3::new(1.0, 2.0, 3.0))],
            Vec::new(),
        );
        history.append(&batch);

        assert_eq!(history.emg_channel(0, 3), vec![3.0, 4.0, 5.0]);
        assert_eq!(history.emg_channel(8, 3), Vec::<f64>::new());
        assert_eq!(history.gyroscope_axis(2, 10), vec![3.0]);
        assert_eq!(history.orientation_axis(3, 10), vec![1.0]);
        assert!(history.acceleration_axis(0, 10).is_empty());
        assert_eq!(history.total_len(), 7);
    }
}
