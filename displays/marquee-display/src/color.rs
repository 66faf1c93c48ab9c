//! 24-bit colours as carried in data payloads (`0xRRGGBB`)

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// A 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const RED: Color = Color(0xFF0000);
    pub const GREEN: Color = Color(0x00FF00);
    pub const BLUE: Color = Color(0x0000FF);
    pub const TEAL: Color = Color(0x0D98BA);
    pub const ORANGE: Color = Color(0xFFA500);
    pub const YELLOW: Color = Color(0xFFFF00);
    pub const PURPLE: Color = Color(0x800080);
    pub const MAROON: Color = Color(0x800000);

    /// Build a colour from components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Build a colour from a payload integer, ignoring bits above 24
    pub const fn from_payload(value: u64) -> Self {
        Color((value & 0xFF_FFFF) as u32)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// True for pure black (LEDs off)
    pub const fn is_off(self) -> bool {
        self.0 & 0xFF_FFFF == 0
    }
}

impl From<Color> for Rgb888 {
    fn from(c: Color) -> Self {
        Rgb888::new(c.r(), c.g(), c.b())
    }
}

impl From<Rgb888> for Color {
    fn from(c: Rgb888) -> Self {
        Color::rgb(c.r(), c.g(), c.b())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        let c = Color(0x0D98BA);
        assert_eq!((c.r(), c.g(), c.b()), (0x0D, 0x98, 0xBA));
        assert_eq!(Color::rgb(0x0D, 0x98, 0xBA), c);
    }

    #[test]
    fn test_payload_masking() {
        assert_eq!(Color::from_payload(0x1_FF_00_00), Color::RED);
    }

    #[test]
    fn test_rgb888_conversion() {
        let px: Rgb888 = Color::ORANGE.into();
        assert_eq!(Color::from(px), Color::ORANGE);
    }
}
