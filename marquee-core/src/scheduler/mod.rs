//! Display rotation scheduler
//!
//! Decides, once per tick, which screen is current and for how long.
//! Button overrides beat fresh greetings and messages, which beat the
//! regular rotation.

pub mod rotation;

pub use rotation::{Scheduler, TickInput, TickOutcome};
