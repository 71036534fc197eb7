// src/acquisition/ring_buffer.rs
//! Fixed-capacity ring buffer holding the most recent samples

use thiserror::Error;

/// A timestamped payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<P> {
    /// Device timestamp in microseconds
    pub timestamp: u64,
    pub payload: P,
}

impl<P> Sample<P> {
    pub fn new(timestamp: u64, payload: P) -> Self {
        Self { timestamp, payload }
    }
}

/// Ring buffer error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BufferError {
    #[error("invalid buffer capacity {0} (must be at least 1)")]
    InvalidCapacity(usize),
}

/// Sliding window over the last `capacity` pushed items
///
/// Pushing into a full buffer overwrites the oldest item. Reading never
/// consumes: [`BoundedBuffer::snapshot`] copies the window out in arrival
/// order. The buffer is not synchronized; callers wrap it in a lock.
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    // Index of the oldest item once the buffer is full
    head: usize,
    total_pushed: u64,
}

impl<T: Clone> BoundedBuffer<T> {
    /// Create an empty buffer holding at most `capacity` items
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity(capacity));
        }

        Ok(Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            total_pushed: 0,
        })
    }

    /// Append an item, evicting the oldest one when full
    pub fn push(&mut self, item: T) {
        if self.slots.len() < self.capacity {
            self.slots.push(item);
        } else {
            self.slots[self.head] = item;
            self.head = (self.head + 1) % self.capacity;
        }
        self.total_pushed += 1;
    }

    /// Copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.slots.len());
        out.extend_from_slice(&self.slots[self.head..]);
        out.extend_from_slice(&self.slots[..self.head]);
        out
    }

    /// Most recently pushed item
    pub fn latest(&self) -> Option<&T> {
        if self.slots.is_empty() {
            return None;
        }
        let idx = (self.head + self.slots.len() - 1) % self.slots.len();
        self.slots.get(idx)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items pushed since creation, evicted ones included
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed
    }

    /// Current utilization (0.0 to 1.0)
    pub fn utilization(&self) -> f32 {
        self.slots.len() as f32 / self.capacity as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_capacity() {
        let mut buffer = BoundedBuffer::new(4).unwrap();
        buffer.push(1);
        buffer.push(2);

        assert_eq!(buffer.snapshot(), vec![1, 2]);
        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_full());
    }

    #[test]
    fn test_eviction_keeps_most_recent_in_order() {
        let mut buffer = BoundedBuffer::new(3).unwrap();
        for i in 1..=7 {
            buffer.push(i);
        }

        assert_eq!(buffer.snapshot(), vec![5, 6, 7]);
        assert_eq!(buffer.latest(), Some(&7));
        assert_eq!(buffer.total_pushed(), 7);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_snapshot_does_not_consume() {
        let mut buffer = BoundedBuffer::new(8).unwrap();
        buffer.push(Sample::new(1, [0i8; 8]));
        buffer.push(Sample::new(2, [1i8; 8]));

        let first = buffer.snapshot();
        let second = buffer.snapshot();
        assert_eq!(first, second);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_capacity_one() {
        let mut buffer = BoundedBuffer::new(1).unwrap();
        buffer.push("a");
        buffer.push("b");
        assert_eq!(buffer.snapshot(), vec!["b"]);
    }

    #[test]
    fn test_utilization() {
        let mut buffer = BoundedBuffer::new(8).unwrap();
        assert_eq!(buffer.utilization(), 0.0);
        assert!(buffer.latest().is_none());

        buffer.push(1);
        buffer.push(2);
        assert_eq!(buffer.utilization(), 0.25);
    }

    #[test]
    fn test_invalid_capacity() {
        assert_eq!(
            BoundedBuffer::<i32>::new(0).unwrap_err(),
            BufferError::InvalidCapacity(0)
        );
        assert!(BoundedBuffer::<i32>::new(3).is_ok());
    }
}
