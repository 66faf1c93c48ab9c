//! Screen capability traits
//!
//! These traits define the interface between the scheduler and the
//! individual screens.

pub mod screen;

pub use screen::{
    ClockReading, ClockScreen, Screen, ScreenContext, ScreenError, ScreenTable, ShowOutcome,
};
