//! Gaze session — routes decoded tracker messages into a smoother.
//!
//! Keeps the device name and state flags reported by the tracker, resets
//! the smoother whenever tracking (re)starts, and turns positional samples
//! into smoothed cursor locations.

use tracing::{debug, info, trace};

use crate::classify::GazeState;
use crate::message::{DeviceState, GazeSample, TrackerMessage};
use crate::sample::RawPoint;
use crate::smoother::{Smoother, SmootherConfig};

// ── Events ─────────────────────────────────────────────────

/// Outcome of handling one tracker message.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Tracker reported a device name.
    Device { name: String },
    /// Tracking switched on.
    Started,
    /// Tracking switched off.
    Stopped,
    /// Device flags changed without affecting tracking.
    StateChanged { state: DeviceState },
    /// A sample was smoothed.
    Sample {
        raw: GazeSample,
        smoothed: RawPoint,
        gaze_state: GazeState,
    },
    /// Message carried nothing for the session.
    Ignored,
}

// ── Session ────────────────────────────────────────────────

/// One tracker connection's worth of gaze state.
pub struct GazeSession {
    smoother: Smoother<RawPoint>,
    device_name: Option<String>,
    device_state: DeviceState,
    last_sample: Option<GazeSample>,
    location: Option<RawPoint>,
    samples_seen: u64,
}

impl GazeSession {
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            smoother: Smoother::new(config),
            device_name: None,
            device_state: DeviceState::default(),
            last_sample: None,
            location: None,
            samples_seen: 0,
        }
    }

    /// Apply one tracker message.
    pub fn handle(&mut self, message: TrackerMessage) -> SessionEvent {
        match message {
            TrackerMessage::Sample(sample) => self.on_sample(sample),
            TrackerMessage::State { value } => self.on_state(value),
            TrackerMessage::Device { name } => {
                info!("Tracker device: {}", name);
                self.device_name = Some(name.clone());
                SessionEvent::Device { name }
            }
            TrackerMessage::Custom { .. } => {
                debug!("Ignoring custom tracker message");
                SessionEvent::Ignored
            }
        }
    }

    fn on_state(&mut self, state: DeviceState) -> SessionEvent {
        let was_tracking = self.device_state.is_tracking();
        self.device_state = state;

        match (was_tracking, state.is_tracking()) {
            (false, true) => {
                self.smoother.reset();
                self.location = None;
                info!("Tracking started");
                SessionEvent::Started
            }
            (true, false) => {
                info!("Tracking stopped after {} samples", self.samples_seen);
                self.samples_seen = 0;
                SessionEvent::Stopped
            }
            _ => SessionEvent::StateChanged { state },
        }
    }

    fn on_sample(&mut self, sample: GazeSample) -> SessionEvent {
        let smoothed = self.smoother.feed(sample.to_point());
        trace!(
            "sample {} ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            sample.ts,
            sample.x,
            sample.y,
            smoothed.x,
            smoothed.y
        );
        self.last_sample = Some(sample);
        self.location = Some(smoothed);
        self.samples_seen += 1;
        SessionEvent::Sample {
            raw: sample,
            smoothed,
            gaze_state: self.smoother.state(),
        }
    }

    pub fn smoother(&self) -> &Smoother<RawPoint> {
        &self.smoother
    }

    pub fn smoother_mut(&mut self) -> &mut Smoother<RawPoint> {
        &mut self.smoother
    }

    pub fn is_tracking(&self) -> bool {
        self.device_state.is_tracking()
    }

    pub fn device_state(&self) -> DeviceState {
        self.device_state
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn last_sample(&self) -> Option<&GazeSample> {
        self.last_sample.as_ref()
    }

    /// Latest smoothed location.
    pub fn location(&self) -> Option<RawPoint> {
        self.location
    }

    /// Status line for logging or IPC.
    pub fn status_sexp(&self) -> String {
        let device = match &self.device_name {
            Some(n) => format!("\"{}\"", n.replace('\\', "\\\\").replace('"', "\\\"")),
            None => "nil".to_string(),
        };
        let location = match self.location {
            Some(p) => format!("({:.1} {:.1})", p.x, p.y),
            None => "nil".to_string(),
        };
        format!(
            "(:device {} :state {} :gaze :{} :interval {} :buffer-full {} :location {})",
            device,
            self.device_state.to_sexp(),
            self.smoother.state().as_str(),
            self.smoother.interval(),
            if self.smoother.is_buffer_full() { "t" } else { "nil" },
            location,
        )
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tracking_state() -> DeviceState {
        DeviceState(DeviceState::CONNECTED | DeviceState::CALIBRATED | DeviceState::TRACKING)
    }

    fn sample(ts: u64, x: f32, y: f32) -> TrackerMessage {
        TrackerMessage::Sample(GazeSample {
            ts,
            x,
            y,
            ..Default::default()
        })
    }

    #[test]
    fn test_device_and_state_events() {
        let mut session = GazeSession::new(SmootherConfig::screen_pixels());
        let event = session.handle(TrackerMessage::Device {
            name: "Simulator".to_string(),
        });
        assert_eq!(
            event,
            SessionEvent::Device {
                name: "Simulator".to_string()
            }
        );
        assert_eq!(session.device_name(), Some("Simulator"));

        let connected = DeviceState(DeviceState::CONNECTED);
        assert_eq!(
            session.handle(TrackerMessage::State { value: connected }),
            SessionEvent::StateChanged { state: connected }
        );
        assert_eq!(
            session.handle(TrackerMessage::State {
                value: tracking_state()
            }),
            SessionEvent::Started
        );
        assert!(session.is_tracking());
        assert_eq!(
            session.handle(TrackerMessage::State { value: connected }),
            SessionEvent::Stopped
        );
    }

    #[test]
    fn test_sample_updates_location() {
        let mut session = GazeSession::new(SmootherConfig::screen_pixels());
        session.handle(TrackerMessage::State {
            value: tracking_state(),
        });
        let event = session.handle(sample(0, 10.0, 20.0));
        match event {
            SessionEvent::Sample { smoothed, .. } => {
                assert_eq!(smoothed, RawPoint::new(0, 10.0, 20.0));
            }
            other => panic!("expected sample event, got {:?}", other),
        }
        assert_eq!(session.location(), Some(RawPoint::new(0, 10.0, 20.0)));
        assert_eq!(session.last_sample().map(|s| s.ts), Some(0));
    }

    #[test]
    fn test_restart_resets_smoother() {
        let mut session = GazeSession::new(SmootherConfig::screen_pixels());
        session.handle(TrackerMessage::State {
            value: tracking_state(),
        });
        for i in 0..10u64 {
            session.handle(sample(i * 33, 500.0, 500.0));
        }
        assert!(session.smoother().is_buffer_full());
        assert_eq!(session.smoother().interval(), 33);

        session.handle(TrackerMessage::State {
            value: DeviceState(DeviceState::CONNECTED),
        });
        session.handle(TrackerMessage::State {
            value: tracking_state(),
        });
        assert!(!session.smoother().is_buffer_full());
        assert_eq!(session.smoother().interval(), 0);
        assert!(session.location().is_none());
    }

    #[test]
    fn test_custom_is_ignored() {
        let mut session = GazeSession::new(SmootherConfig::default());
        let event = session.handle(TrackerMessage::Custom {
            payload: serde_json::Map::new(),
        });
        assert_eq!(event, SessionEvent::Ignored);
    }

    #[test]
    fn test_status_sexp() {
        let mut session = GazeSession::new(SmootherConfig::screen_pixels());
        assert_eq!(
            session.status_sexp(),
            "(:device nil :state (:connected nil :calibrated nil :tracking nil :busy nil) \
             :gaze :fixation :interval 0 :buffer-full nil :location nil)"
        );

        session.handle(TrackerMessage::Device {
            name: "Tobii".to_string(),
        });
        session.handle(TrackerMessage::State {
            value: tracking_state(),
        });
        session.handle(sample(0, 1.0, 2.0));
        let status = session.status_sexp();
        assert!(status.contains(":device \"Tobii\""));
        assert!(status.contains(":tracking t"));
        assert!(status.contains(":location (1.0 2.0)"));
        // Restarting tracking resets the smoother to the unknown state
        assert!(status.contains(":gaze :unknown"));
    }

    #[test]
    fn test_status_sexp_escapes_device_name() {
        let mut session = GazeSession::new(SmootherConfig::default());
        session.handle(TrackerMessage::Device {
            name: r#"Eye "X" C:\"#.to_string(),
        });
        assert!(session
            .status_sexp()
            .starts_with(r#"(:device "Eye \"X\" C:\\" :state"#));
    }
}
