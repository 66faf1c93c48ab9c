//! GPIO wrappers
//!
//! Adapts embassy-rp pins to the `marquee-hal` pin traits.

use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;

/// Active-low push button with internal pull-up
pub struct ButtonInput<'d> {
    input: Input<'d>,
}

impl<'d> ButtonInput<'d> {
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            input: Input::new(pin, Pull::Up),
        }
    }
}

impl marquee_hal::InputPin for ButtonInput<'_> {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}

/// Push-pull output line
pub struct Line<'d> {
    output: Output<'d>,
}

impl<'d> Line<'d> {
    /// Create a line driven low
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            output: Output::new(pin, Level::Low),
        }
    }

    /// Create a line driven high (active-low enables)
    pub fn new_high(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            output: Output::new(pin, Level::High),
        }
    }
}

impl marquee_hal::OutputPin for Line<'_> {
    fn set_high(&mut self) {
        self.output.set_high();
    }

    fn set_low(&mut self) {
        self.output.set_low();
    }
}
