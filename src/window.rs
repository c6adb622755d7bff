//! Time-windowed sample buffer.
//!
//! Holds the samples of the last `time_window` milliseconds, oldest first.
//! Timestamp differences use wrapping `u64` subtraction: a sample older
//! than the head makes every buffered entry look ancient, so the window
//! collapses to the newest sample and the buffer reports full if it held
//! more than three samples.

use std::collections::VecDeque;
use tracing::warn;

use crate::sample::RawSample;

/// Minimum sample count (exclusive) before the window can report full.
const MIN_FULL_COUNT: usize = 3;

/// Sliding window of recent raw samples.
#[derive(Debug, Clone)]
pub struct SampleWindow<T: RawSample> {
    samples: VecDeque<T>,
    time_window: u64,
    full: bool,
}

impl<T: RawSample> SampleWindow<T> {
    /// Empty window spanning `time_window` ms.
    pub fn new(time_window: u64) -> Self {
        Self {
            samples: VecDeque::new(),
            time_window,
            full: false,
        }
    }

    /// Append `sample`, evict expired entries and return whether the window
    /// has ever spanned `time_window` with more than three samples.
    pub fn insert(&mut self, sample: T) -> bool {
        let timestamp = sample.timestamp();
        self.samples.push_back(sample);

        let first_timestamp = match self.samples.front() {
            Some(head) => head.timestamp(),
            None => return self.full,
        };
        if timestamp < first_timestamp {
            warn!(
                "Non-monotonic gaze timestamp: {} precedes window head {}",
                timestamp, first_timestamp
            );
        }

        if !self.full {
            self.full = timestamp.wrapping_sub(first_timestamp) >= self.time_window
                && self.samples.len() > MIN_FULL_COUNT;
        }

        // The newest sample always stays, even with a zero-length window.
        while let Some(head) = self.samples.front() {
            if timestamp.wrapping_sub(head.timestamp()) >= self.time_window
                && self.samples.len() > 1
            {
                self.samples.pop_front();
            } else {
                break;
            }
        }

        self.full
    }

    /// Whether the window has filled since the last `clear`.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest buffered sample.
    pub fn head(&self) -> Option<&T> {
        self.samples.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    /// Window span, ms.
    pub fn time_window(&self) -> u64 {
        self.time_window
    }

    /// Change the window span. Takes effect on the next insertion.
    pub fn set_time_window(&mut self, time_window: u64) {
        self.time_window = time_window;
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.full = false;
    }
}

// ── Tests ───────────────────────────────────────────────────
