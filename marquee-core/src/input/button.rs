//! Debounced button with long-press detection

/// What a button is doing this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Not held, or held past a long press that was already reported
    #[default]
    Released,
    /// Held (reported on every tick)
    Pressed,
    /// Held for the long-press threshold (reported once per hold)
    LongPress,
}

/// Debounce and hold tracking for one button
#[derive(Debug, Clone)]
pub struct Button {
    debounce_ms: u64,
    long_press_ms: u64,
    /// Debounced level
    stable: bool,
    /// Raw level last seen and when it last changed
    raw: bool,
    raw_since: u64,
    /// When the debounced press began
    pressed_at: u64,
    long_reported: bool,
}

impl Button {
    pub fn new(debounce_ms: u64, long_press_ms: u64) -> Self {
        Self {
            debounce_ms,
            long_press_ms,
            stable: false,
            raw: false,
            raw_since: 0,
            pressed_at: 0,
            long_reported: false,
        }
    }

    /// Feed the raw level (`true` = pressed) sampled at `now_ms`
    pub fn update(&mut self, raw_pressed: bool, now_ms: u64) -> ButtonEvent {
        if raw_pressed != self.raw {
            self.raw = raw_pressed;
            self.raw_since = now_ms;
        }

        if self.raw != self.stable && now_ms.saturating_sub(self.raw_since) >= self.debounce_ms {
            self.stable = self.raw;
            if self.stable {
                self.pressed_at = now_ms;
                self.long_reported = false;
            }
        }

        if !self.stable || self.long_reported {
            return ButtonEvent::Released;
        }

        if now_ms.saturating_sub(self.pressed_at) >= self.long_press_ms {
            self.long_reported = true;
            return ButtonEvent::LongPress;
        }

        ButtonEvent::Pressed
    }

    /// Debounced level
    pub fn is_held(&self) -> bool {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_released() {
        let mut button = Button::new(20, 3000);
        assert_eq!(button.update(false, 0), ButtonEvent::Released);
        assert_eq!(button.update(false, 1000), ButtonEvent::Released);
    }

    #[test]
    fn test_press_after_debounce() {
        let mut button = Button::new(20, 3000);
        assert_eq!(button.update(true, 100), ButtonEvent::Released);
        assert_eq!(button.update(true, 110), ButtonEvent::Released);
        assert_eq!(button.update(true, 120), ButtonEvent::Pressed);
        assert!(button.is_held());
        // Level semantics: every tick while held
        assert_eq!(button.update(true, 170), ButtonEvent::Pressed);
    }

    #[test]
    fn test_bounce_is_filtered() {
        let mut button = Button::new(20, 3000);
        button.update(true, 0);
        button.update(false, 5);
        button.update(true, 10);
        assert_eq!(button.update(true, 25), ButtonEvent::Released);
        assert_eq!(button.update(true, 30), ButtonEvent::Pressed);
    }

    #[test]
    fn test_long_press_reported_once() {
        let mut button = Button::new(0, 3000);
        assert_eq!(button.update(true, 0), ButtonEvent::Pressed);
        assert_eq!(button.update(true, 2999), ButtonEvent::Pressed);
        assert_eq!(button.update(true, 3000), ButtonEvent::LongPress);
        assert_eq!(button.update(true, 3050), ButtonEvent::Released);
        assert_eq!(button.update(true, 9000), ButtonEvent::Released);

        // Let go, press again: a fresh hold
        assert_eq!(button.update(false, 9100), ButtonEvent::Released);
        assert_eq!(button.update(true, 9200), ButtonEvent::Pressed);
    }
}
