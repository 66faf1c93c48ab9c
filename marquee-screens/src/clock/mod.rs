//! The clock: home screen and source of local time

pub mod face;
pub mod solar;
pub mod timezone;

pub use face::ClockFace;
pub use solar::{clock_color, is_sundown};
pub use timezone::TimezoneCache;
