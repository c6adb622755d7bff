//! Adaptive gaze smoother.
//!
//! Feeds raw samples through a time window, classifies the window as
//! fixation or saccade and blends each new sample into the running output
//! with a damping ratio chosen by that state. Damping is divided by the
//! estimated sampling interval so the same setting smooths equally at any
//! tracker rate.
//!
//! `time_window` should be long enough to hold at least six samples.
//! Smaller `saccade_threshold` values select the light saccade damping more
//! often.

use tracing::{debug, info, trace};

use crate::classify::{classify, GazeState};
use crate::interval::estimate_interval;
use crate::sample::RawSample;
use crate::window::SampleWindow;

// ── Config ─────────────────────────────────────────────────

/// Smoother configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SmootherConfig {
    /// Smoothing strength during fixations.
    pub damp_fixation: u32,
    /// Smoothing strength during saccades.
    pub damp_saccade: u32,
    /// Window span, ms.
    pub time_window: u64,
    /// Centroid distance separating fixation from saccade, in sample X/Y units.
    pub saccade_threshold: f64,
    /// Sampling interval, ms. 0 means estimate from the data.
    pub interval: u64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            damp_fixation: 100,
            damp_saccade: 1,
            time_window: 100,
            saccade_threshold: 0.02,
            interval: 0,
        }
    }
}

impl SmootherConfig {
    /// Tuning for screen-pixel cursors at ~30 Hz.
    pub fn screen_pixels() -> Self {
        Self {
            damp_fixation: 700,
            damp_saccade: 1,
            time_window: 150,
            saccade_threshold: 30.0,
            interval: 0,
        }
    }
}

// ── Smoother ───────────────────────────────────────────────

/// Stateful fixation-aware smoother for one gaze stream.
#[derive(Debug, Clone)]
pub struct Smoother<T: RawSample> {
    config: SmootherConfig,
    window: SampleWindow<T>,
    current: Option<T>,
    state: GazeState,
    interval: u64,
}

impl<T: RawSample> Smoother<T> {
    pub fn new(config: SmootherConfig) -> Self {
        info!(
            "Gaze smoother initialized (fixation={}, saccade={}, window={}ms, threshold={})",
            config.damp_fixation, config.damp_saccade, config.time_window, config.saccade_threshold
        );
        Self {
            window: SampleWindow::new(config.time_window),
            interval: config.interval,
            current: None,
            state: GazeState::Fixation,
            config,
        }
    }

    /// Take a raw sample and return the smoothed one.
    ///
    /// Until the window is full, and whenever the window cannot be
    /// classified, the sample is returned unchanged.
    pub fn feed(&mut self, sample: T) -> T {
        let timestamp = sample.timestamp();

        if !self.window.insert(sample.clone()) {
            trace!("warm-up passthrough at {}", timestamp);
            return self.pass_through(sample);
        }

        let state = classify(&self.window, self.config.saccade_threshold);
        if state != self.state {
            debug!("Gaze state {} -> {}", self.state.as_str(), state.as_str());
        }
        self.state = state;
        if state == GazeState::Unknown {
            return self.pass_through(sample);
        }

        if self.interval == 0 {
            self.interval = estimate_interval(&self.window, timestamp);
            if self.interval == 0 {
                return self.pass_through(sample);
            }
            info!("Sampling interval estimated at {}ms", self.interval);
            self.current = Some(sample.clone());
        }

        let alpha = self.damp() as f64 / self.interval as f64;
        let current = self.current.get_or_insert_with(|| sample.clone());
        current.blend_toward(&sample, alpha, timestamp);
        trace!(
            "smoothed {} ({}, alpha={:.3})",
            timestamp,
            state.as_str(),
            alpha
        );
        current.clone()
    }

    /// Clear all history. The next sample starts a fresh warm-up.
    pub fn reset(&mut self) {
        self.window.clear();
        self.current = None;
        self.interval = 0;
        self.state = GazeState::Unknown;
        info!("Gaze smoother reset");
    }

    fn pass_through(&mut self, sample: T) -> T {
        self.current = Some(sample.clone());
        sample
    }

    fn damp(&self) -> u32 {
        match self.state {
            GazeState::Fixation => self.config.damp_fixation,
            _ => self.config.damp_saccade,
        }
    }

    pub fn config(&self) -> &SmootherConfig {
        &self.config
    }

    /// Replace the configuration. The window span follows on the next sample;
    /// a non-zero `interval` overrides the current estimate.
    pub fn set_config(&mut self, config: SmootherConfig) {
        self.window.set_time_window(config.time_window);
        if config.interval != 0 {
            self.interval = config.interval;
        }
        self.config = config;
    }

    pub fn set_damp_fixation(&mut self, damp: u32) {
        self.config.damp_fixation = damp;
    }

    pub fn set_damp_saccade(&mut self, damp: u32) {
        self.config.damp_saccade = damp;
    }

    pub fn set_time_window(&mut self, time_window: u64) {
        self.config.time_window = time_window;
        self.window.set_time_window(time_window);
    }

    pub fn set_saccade_threshold(&mut self, threshold: f64) {
        self.config.saccade_threshold = threshold;
    }

    /// Sampling interval in use, ms. 0 until estimated.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Force the sampling interval. 0 re-enables estimation.
    pub fn set_interval(&mut self, interval: u64) {
        self.interval = interval;
    }

    pub fn state(&self) -> GazeState {
        self.state
    }

    pub fn is_buffer_full(&self) -> bool {
        self.window.is_full()
    }

    /// Number of samples currently in the window.
    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    /// Last output of `feed`, if any.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

impl<T: RawSample> Default for Smoother<T> {
    fn default() -> Self {
        Self::new(SmootherConfig::default())
    }
}

// ── Tests ───────────────────────────────────────────────────
