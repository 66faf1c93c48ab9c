//! Tone sequences on the buzzer
//!
//! The `tones` key holds
//! `{"tones": [{"frequency": 440, "duration": 0.5, "volume": 100}, ...]}`
//! with frequency in Hz, duration in seconds and volume in percent.
//! Playing is a side channel: it never affects which screen is shown.

pub mod player;

pub use player::{Tone, Tones, MAX_TONES};
