//! Fixed-capacity sliding window of samples

use crate::config::MAX_WINDOW_SAMPLES;
use eeg_core::{EegError, EegResult, Sample};
use std::collections::VecDeque;
use std::sync::Arc;

/// Chronological FIFO window; the oldest sample is evicted on overflow
///
/// Samples are shared so snapshots can hold the window without copying
/// channel maps.
#[derive(Debug, Clone)]
pub struct SignalBuffer {
    samples: VecDeque<Arc<Sample>>,
    capacity: usize,
}

impl SignalBuffer {
    pub fn new(capacity: usize) -> EegResult<Self> {
        if capacity == 0 {
            return Err(EegError::InvalidParameter {
                name: "capacity",
                value: 0.0,
                reason: "window must hold at least one sample",
            });
        }
        if capacity > MAX_WINDOW_SAMPLES {
            return Err(EegError::InvalidParameter {
                name: "capacity",
                value: capacity as f64,
                reason: "window must not exceed 1000000 samples",
            });
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Build a window from existing samples, keeping the newest `capacity`
    pub fn from_samples(samples: Vec<Sample>, capacity: usize) -> EegResult<Self> {
        let mut buffer = Self::new(capacity)?;
        for sample in samples {
            buffer.push(sample);
        }
        Ok(buffer)
    }

    /// Append a sample, returning the evicted one if the window was full
    pub fn push(&mut self, sample: Sample) -> Option<Arc<Sample>> {
        self.samples.push_back(Arc::new(sample));
        if self.samples.len() > self.capacity {
            self.samples.pop_front()
        } else {
            None
        }
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back().map(Arc::as_ref)
    }

    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter().map(Arc::as_ref)
    }

    /// The window in order, sharing every sample
    pub fn shared(&self) -> Arc<[Arc<Sample>]> {
        self.samples.iter().cloned().collect()
    }
}
