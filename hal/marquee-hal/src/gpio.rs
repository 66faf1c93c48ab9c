//! GPIO pin abstractions
//!
//! Buttons are active-low inputs with pull-ups; the panel address and
//! colour lines are plain outputs.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Input pin wired to a push button
///
/// Blanket-implemented for every [`InputPin`]; buttons pull the line low
/// when held.
pub trait ButtonPin: InputPin {
    /// Whether the button is currently held down
    fn is_pressed(&self) -> bool {
        self.is_low()
    }
}

impl<T: InputPin> ButtonPin for T {}
