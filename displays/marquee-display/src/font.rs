//! Type sizes
//!
//! All fonts are monospaced, so widths are a simple multiple of the
//! character count.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_4X6, FONT_6X10};
use embedded_graphics::mono_font::MonoFont;

use crate::PANEL_WIDTH;

/// Font used by a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// 4x6, used for the corner clock on data screens
    Mini,
    /// 6x10, general text
    Small,
    /// 10x20, the main clock face
    Large,
}

impl Font {
    /// The embedded-graphics font backing this size
    pub fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Font::Mini => &FONT_4X6,
            Font::Small => &FONT_6X10,
            Font::Large => &FONT_10X20,
        }
    }

    /// Glyph cell width in pixels
    pub const fn char_width(self) -> i32 {
        match self {
            Font::Mini => 4,
            Font::Small => 6,
            Font::Large => 10,
        }
    }

    /// Glyph cell height in pixels
    pub const fn char_height(self) -> i32 {
        match self {
            Font::Mini => 6,
            Font::Small => 10,
            Font::Large => 20,
        }
    }

    /// Rendered width of `text` in pixels
    pub fn text_width(self, text: &str) -> i32 {
        text.chars().count() as i32 * self.char_width()
    }

    /// X position that centres `text` on the panel
    ///
    /// Negative when the text is wider than the panel.
    pub fn centered_x(self, text: &str) -> i32 {
        (PANEL_WIDTH as i32 - self.text_width(text)) / 2
    }

    /// Whether `text` fits on one panel line
    pub fn fits(self, text: &str) -> bool {
        self.text_width(text) <= PANEL_WIDTH as i32
    }
}
