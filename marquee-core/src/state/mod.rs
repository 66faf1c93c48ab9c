//! Screen state machine
//!
//! Exactly one screen is current at any time. Which screen comes next is
//! a pure function of the current screen and a cue; how long it stays is
//! decided by the scheduler.

pub mod cues;
pub mod screen;

pub use cues::Cue;
pub use screen::{Rotation, ScreenId};
