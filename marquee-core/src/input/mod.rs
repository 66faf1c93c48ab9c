//! Button input tracking

pub mod button;

pub use button::{Button, ButtonEvent};
