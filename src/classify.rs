//! Fixation / saccade classification over a sample window.
//!
//! The window is split at half its configured span, measured from the
//! oldest buffered sample. If the centroids of the two halves are further
//! apart than the saccade threshold the gaze is moving.

use crate::sample::RawSample;
use crate::window::SampleWindow;

// ── GazeState ───────────────────────────────────────────────

/// Gaze state as seen by the smoother.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GazeState {
    /// Not enough spread in the window to decide.
    Unknown,
    /// Gaze is stable; smooth strongly.
    Fixation,
    /// Gaze is moving fast; smooth lightly.
    Saccade,
}

impl GazeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Fixation => "fixation",
            Self::Saccade => "saccade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "unknown" => Some(Self::Unknown),
            "fixation" => Some(Self::Fixation),
            "saccade" => Some(Self::Saccade),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Centroid {
    sum_x: f64,
    sum_y: f64,
    count: usize,
}

impl Centroid {
    fn add(&mut self, x: f32, y: f32) {
        self.sum_x += x as f64;
        self.sum_y += y as f64;
        self.count += 1;
    }

    fn mean(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some((self.sum_x / n, self.sum_y / n))
    }
}

/// Classify the current window contents.
///
/// Samples more than `time_window / 2` ms after the head form the later half,
/// the rest the earlier half. An empty half yields `Unknown`; otherwise the
/// centroid distance is compared against `saccade_threshold` and only a
/// strictly greater distance counts as a saccade.
pub fn classify<T: RawSample>(window: &SampleWindow<T>, saccade_threshold: f64) -> GazeState {
    let oldest = match window.head() {
        Some(head) => head.timestamp(),
        None => return GazeState::Unknown,
    };
    let half = window.time_window() / 2;

    let mut earlier = Centroid::default();
    let mut later = Centroid::default();
    for sample in window.iter() {
        if sample.timestamp().wrapping_sub(oldest) > half {
            later.add(sample.x(), sample.y());
        } else {
            earlier.add(sample.x(), sample.y());
        }
    }

    match (earlier.mean(), later.mean()) {
        (Some((ex, ey)), Some((lx, ly))) => {
            let dx = lx - ex;
            let dy = ly - ey;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > saccade_threshold {
                GazeState::Saccade
            } else {
                GazeState::Fixation
            }
        }
        _ => GazeState::Unknown,
    }
}

// ── Tests ───────────────────────────────────────────────────
