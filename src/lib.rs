//! Adaptive gaze smoothing — fixation-aware filtering of eye tracker streams.
//!
//! The core is [`smoother::Smoother`], generic over any [`sample::RawSample`].
//! The tracker message model, message sources, a simulator and a session
//! wrapper sit around it for collaborators that consume tracker output.

pub mod classify;
pub mod interval;
pub mod message;
pub mod sample;
pub mod session;
pub mod simulator;
pub mod smoother;
pub mod source;
pub mod window;

pub use classify::GazeState;
pub use sample::{RawPoint, RawSample, RawVector, Vec3};
pub use smoother::{Smoother, SmootherConfig};
