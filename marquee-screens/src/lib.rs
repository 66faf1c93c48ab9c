//! Screen implementations
//!
//! This crate provides the concrete screens the scheduler in
//! marquee-core drives, plus the tone player:
//!
//! - Clock (timezone transitions, solar colouring, sundown)
//! - Interrupt screens (IP address, splash, greeting, message)
//! - Rotation screens (weather, air quality, UV index, pollen)
//! - Tone sequences on a buzzer

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod clock;
pub mod interrupt;
pub mod layout;
pub mod rotation;
pub mod tones;

pub use clock::{ClockFace, TimezoneCache};
pub use interrupt::{Greet, IpAddress, Message, Splash};
pub use rotation::{Aqi, Pollen, Uv, Weather};
pub use tones::{Tone, Tones};
