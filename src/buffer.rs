//! # Rolling Buffer
//!
//! A capacity-bounded, insertion-ordered window of the most recent samples.
//! Once the buffer is full every append evicts the oldest sample, so the
//! contents are always the last `capacity` samples in chronological order.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::sample::Sample;

/// Number of samples retained by default (100 seconds at one sample per second)
pub const DEFAULT_CAPACITY: usize = 100;

/// FIFO-evicting window of samples
#[derive(Debug, Clone, PartialEq)]
pub struct RollingBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for RollingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingBuffer {
    /// Buffer holding [`DEFAULT_CAPACITY`] samples
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Buffer holding at most `capacity` samples (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting and returning the oldest one when full
    pub fn append(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Maximum number of retained samples
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample has been appended yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True once the buffer has started evicting
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Oldest retained sample
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator {
        self.samples.iter()
    }

    /// Owned copy of the contents in chronological order
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// First and last timestamps of the retained samples
    pub fn time_extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.oldest()?.timestamp, self.latest()?.timestamp))
    }

    /// Drop all samples, keeping the capacity
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Extend<Sample> for RollingBuffer {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        for sample in iter {
            self.append(sample);
        }
    }
}

impl<'a> IntoIterator for &'a RollingBuffer {
    type Item = &'a Sample;
    type IntoIter = std::collections::vec_deque::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
