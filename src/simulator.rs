//! Simulated gaze tracker for development without eye tracking hardware.
//!
//! Behaves like a tracker service: announces itself as "Simulator",
//! reports Connected|Calibrated, and while tracking emits one sample every
//! 33 ms along a deterministic path.

use std::collections::VecDeque;

use tracing::info;

use crate::message::{DeviceState, GazeSample, MessageError, TrackerMessage};
use crate::source::MessageSource;

/// Sampling interval of the simulator, ms.
pub const SAMPLING_INTERVAL_MS: u64 = 33;

/// Pupil size reported with every simulated sample.
const PUPIL_SIZE: f32 = 6.0;

// ── Paths ──────────────────────────────────────────────────

/// Gaze path followed by the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulatedPath {
    /// Gaze rests on one point with small tremor.
    Fixed { x: f32, y: f32, jitter: f32 },
    /// Gaze moves at constant velocity (units per sample).
    Ramp { x: f32, y: f32, dx: f32, dy: f32 },
    /// Fixations on alternating targets, jumping every `dwell_ms`.
    Jumps {
        a: (f32, f32),
        b: (f32, f32),
        dwell_ms: u64,
        jitter: f32,
    },
}

impl SimulatedPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "fixed",
            Self::Ramp { .. } => "ramp",
            Self::Jumps { .. } => "jumps",
        }
    }

    /// Default path of each kind, around a 1920x1080 screen center.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fixed" => Some(Self::Fixed {
                x: 960.0,
                y: 540.0,
                jitter: 4.0,
            }),
            "ramp" => Some(Self::Ramp {
                x: 100.0,
                y: 540.0,
                dx: 50.0,
                dy: 0.0,
            }),
            "jumps" => Some(Self::Jumps {
                a: (480.0, 540.0),
                b: (1440.0, 540.0),
                dwell_ms: 600,
                jitter: 4.0,
            }),
            _ => None,
        }
    }

    /// Position at sample `index` (timestamp `ts`).
    pub fn position(&self, index: u64, ts: u64) -> (f32, f32) {
        match *self {
            Self::Fixed { x, y, jitter } => {
                let (jx, jy) = tremor(index, jitter);
                (x + jx, y + jy)
            }
            Self::Ramp { x, y, dx, dy } => (x + dx * index as f32, y + dy * index as f32),
            Self::Jumps {
                a,
                b,
                dwell_ms,
                jitter,
            } => {
                let (tx, ty) = if (ts / dwell_ms.max(1)) % 2 == 0 { a } else { b };
                let (jx, jy) = tremor(index, jitter);
                (tx + jx, ty + jy)
            }
        }
    }
}

/// Deterministic bounded tremor.
fn tremor(index: u64, amplitude: f32) -> (f32, f32) {
    let t = index as f64;
    (
        ((t * 1.7).sin() * amplitude as f64) as f32,
        ((t * 1.3).cos() * amplitude as f64) as f32,
    )
}

// ── Simulator ──────────────────────────────────────────────

/// Simulated tracker service.
#[derive(Debug)]
pub struct GazeSimulator {
    path: SimulatedPath,
    state: DeviceState,
    timestamp: u64,
    index: u64,
    pending: VecDeque<TrackerMessage>,
    /// Samples to emit before the source reports exhaustion. `None` runs forever.
    pub sample_limit: Option<u64>,
}

impl GazeSimulator {
    pub fn new(path: SimulatedPath) -> Self {
        Self {
            path,
            state: DeviceState(DeviceState::CONNECTED | DeviceState::CALIBRATED),
            timestamp: 0,
            index: 0,
            pending: VecDeque::new(),
            sample_limit: None,
        }
    }

    /// Announce the device and its state.
    pub fn initialize(&mut self) {
        self.pending.push_back(TrackerMessage::Device {
            name: "Simulator".to_string(),
        });
        self.pending
            .push_back(TrackerMessage::State { value: self.state });
        info!("Gaze simulator initialized ({} path)", self.path.as_str());
    }

    /// Start or stop streaming. Stopping rewinds the sample clock.
    pub fn toggle_tracking(&mut self) {
        if self.state.is_tracking() {
            self.state = self.state.without(DeviceState::TRACKING);
            self.timestamp = 0;
            self.index = 0;
        } else {
            self.state = self.state.with(DeviceState::TRACKING);
        }
        self.pending
            .push_back(TrackerMessage::State { value: self.state });
        info!("Gaze simulator tracking: {}", self.state.is_tracking());
    }

    pub fn is_tracking(&self) -> bool {
        self.state.is_tracking()
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Produce the next sample, if tracking.
    pub fn tick(&mut self) -> Option<GazeSample> {
        if !self.state.is_tracking() {
            return None;
        }
        if let Some(limit) = self.sample_limit {
            if self.index >= limit {
                return None;
            }
        }

        self.timestamp += SAMPLING_INTERVAL_MS;
        let (x, y) = self.path.position(self.index, self.timestamp);
        self.index += 1;

        Some(GazeSample {
            ts: self.timestamp,
            x,
            y,
            p: PUPIL_SIZE,
            ec: None,
        })
    }
}

impl MessageSource for GazeSimulator {
    fn next_message(&mut self) -> Option<Result<TrackerMessage, MessageError>> {
        if let Some(m) = self.pending.pop_front() {
            return Some(Ok(m));
        }
        self.tick().map(|s| Ok(TrackerMessage::Sample(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_roundtrip() {
        for name in ["fixed", "ramp", "jumps"] {
            assert_eq!(SimulatedPath::from_str(name).map(|p| p.as_str()), Some(name));
        }
        assert!(SimulatedPath::from_str("mouse").is_none());
    }

    #[test]
    fn test_initialize_announces_device() {
        let mut sim = GazeSimulator::new(SimulatedPath::from_str("fixed").unwrap());
        sim.initialize();

        let device = sim.next_message().unwrap().unwrap();
        assert_eq!(
            device,
            TrackerMessage::Device {
                name: "Simulator".to_string()
            }
        );
        let TrackerMessage::State { value } = sim.next_message().unwrap().unwrap() else {
            panic!("expected state");
        };
        assert!(value.is_connected());
        assert!(value.is_calibrated());
        assert!(!value.is_tracking());
        // Not tracking: nothing more to deliver
        assert!(sim.next_message().is_none());
    }

    #[test]
    fn test_samples_every_interval() {
        let mut sim = GazeSimulator::new(SimulatedPath::Ramp {
            x: 0.0,
            y: 0.0,
            dx: 50.0,
            dy: 0.0,
        });
        assert!(sim.tick().is_none());

        sim.toggle_tracking();
        assert!(sim.is_tracking());
        let s1 = sim.tick().unwrap();
        let s2 = sim.tick().unwrap();
        assert_eq!(s1.ts, 33);
        assert_eq!(s2.ts, 66);
        assert_eq!(s2.x - s1.x, 50.0);
        assert_eq!(s1.p, 6.0);
    }

    #[test]
    fn test_stop_rewinds_clock() {
        let mut sim = GazeSimulator::new(SimulatedPath::from_str("fixed").unwrap());
        sim.toggle_tracking();
        sim.tick();
        sim.tick();
        sim.toggle_tracking();
        assert!(!sim.is_tracking());
        sim.toggle_tracking();
        assert_eq!(sim.tick().map(|s| s.ts), Some(33));
    }

    #[test]
    fn test_sample_limit() {
        let mut sim = GazeSimulator::new(SimulatedPath::from_str("fixed").unwrap());
        sim.sample_limit = Some(3);
        sim.toggle_tracking();
        let mut count = 0;
        while let Some(Ok(m)) = sim.next_message() {
            if matches!(m, TrackerMessage::Sample(_)) {
                count += 1;
            }
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_jumps_alternate_targets() {
        let path = SimulatedPath::Jumps {
            a: (0.0, 0.0),
            b: (100.0, 0.0),
            dwell_ms: 100,
            jitter: 0.0,
        };
        assert_eq!(path.position(0, 50), (0.0, 0.0));
        assert_eq!(path.position(3, 150), (100.0, 0.0));
        assert_eq!(path.position(6, 250), (0.0, 0.0));
    }

    #[test]
    fn test_fixed_tremor_is_bounded() {
        let path = SimulatedPath::Fixed {
            x: 10.0,
            y: 10.0,
            jitter: 2.0,
        };
        for i in 0..100 {
            let (x, y) = path.position(i, i * 33);
            assert!((x - 10.0).abs() <= 2.0 + 1e-5);
            assert!((y - 10.0).abs() <= 2.0 + 1e-5);
        }
    }
}
