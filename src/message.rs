//! Tracker service messages.
//!
//! The tracker service emits one JSON object per message, discriminated by
//! its `type` field:
//!
//! ```text
//! {"type":"sample","ts":1200,"x":640.0,"y":360.0,"p":6.1,"ec":{"xl":0.4,"yl":0.5,"xr":0.6,"yr":0.5}}
//! {"type":"state","value":7}
//! {"type":"device","name":"Simulator"}
//! ```
//!
//! Only decoding lives here; how the bytes arrive is the caller's business.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sample::RawPoint;

// ── Errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("malformed tracker message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown tracker message type: {0}")]
    UnknownType(String),
    #[error("failed to read tracker messages: {0}")]
    Io(#[from] std::io::Error),
}

// ── Device state ───────────────────────────────────────────

/// Tracker device state bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceState(pub i32);

impl DeviceState {
    pub const CONNECTED: i32 = 0x01;
    pub const CALIBRATED: i32 = 0x02;
    pub const TRACKING: i32 = 0x04;
    pub const BUSY: i32 = 0x08;

    pub fn is_connected(&self) -> bool {
        self.0 & Self::CONNECTED != 0
    }

    pub fn is_calibrated(&self) -> bool {
        self.0 & Self::CALIBRATED != 0
    }

    pub fn is_tracking(&self) -> bool {
        self.0 & Self::TRACKING != 0
    }

    pub fn is_busy(&self) -> bool {
        self.0 & Self::BUSY != 0
    }

    pub fn with(self, flag: i32) -> Self {
        Self(self.0 | flag)
    }

    pub fn without(self, flag: i32) -> Self {
        Self(self.0 & !flag)
    }

    pub fn to_sexp(&self) -> String {
        let flag = |on: bool| if on { "t" } else { "nil" };
        format!(
            "(:connected {} :calibrated {} :tracking {} :busy {})",
            flag(self.is_connected()),
            flag(self.is_calibrated()),
            flag(self.is_tracking()),
            flag(self.is_busy()),
        )
    }
}

// ── Gaze sample ────────────────────────────────────────────

/// Eye positions in the tracker camera view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EyesInCamera {
    #[serde(default)]
    pub xl: f32,
    #[serde(default)]
    pub yl: f32,
    #[serde(default)]
    pub xr: f32,
    #[serde(default)]
    pub yr: f32,
}

/// Positional gaze sample as sent by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GazeSample {
    /// Timestamp, ms.
    pub ts: u64,
    pub x: f32,
    pub y: f32,
    /// Pupil size.
    #[serde(default)]
    pub p: f32,
    /// Eyes in camera view, when the tracker reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec: Option<EyesInCamera>,
}

impl GazeSample {
    pub fn to_point(&self) -> RawPoint {
        RawPoint::new(self.ts, self.x, self.y)
    }
}

// ── Message ────────────────────────────────────────────────

/// A decoded tracker message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TrackerMessage {
    Sample(GazeSample),
    State { value: DeviceState },
    Device { name: String },
    /// Application-defined payload, passed through untouched.
    Custom {
        #[serde(flatten)]
        payload: serde_json::Map<String, serde_json::Value>,
    },
}

const KNOWN_TYPES: [&str; 4] = ["sample", "state", "device", "custom"];

impl TrackerMessage {
    /// Decode one JSON message.
    pub fn decode(text: &str) -> Result<Self, MessageError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let kind = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();
        if !KNOWN_TYPES.contains(&kind.as_str()) {
            return Err(MessageError::UnknownType(kind));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn encode(&self) -> Result<String, MessageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sample(_) => "sample",
            Self::State { .. } => "state",
            Self::Device { .. } => "device",
            Self::Custom { .. } => "custom",
        }
    }
}

// ── Tests ───────────────────────────────────────────────────
