//! Shared layout helpers

use heapless::String;
use marquee_core::traits::ClockReading;
use marquee_display::{DisplayError, Font, Scene, LABEL_LEN, PANEL_HEIGHT, PANEL_WIDTH};

/// Top edge that centres one line of `font` vertically
pub const fn middle_y(font: Font) -> i32 {
    (PANEL_HEIGHT as i32 - font.char_height()) / 2
}

/// Put the small clock in the top-right corner
pub fn add_mini_clock(scene: &mut Scene, reading: Option<ClockReading>) -> Result<(), DisplayError> {
    let Some(reading) = reading else {
        return Ok(());
    };
    let text = reading.text();
    let x = PANEL_WIDTH as i32 - Font::Mini.text_width(&text);
    scene.add_label(&text, Font::Mini, reading.color, x, 2)
}

/// Text that steps one character left per second when it is too wide
/// for the panel
#[derive(Debug, Clone, Default)]
pub struct ScrollText {
    text: String<LABEL_LEN>,
    font: Option<Font>,
    started: u64,
}

impl ScrollText {
    /// Replace the text and restart scrolling at `now`
    pub fn set(&mut self, text: &str, font: Font, now: u64) {
        self.text.clear();
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                break;
            }
        }
        self.font = Some(font);
        self.started = now;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the text is wider than the panel
    pub fn scrolls(&self) -> bool {
        self.font.is_some_and(|font| !font.fits(&self.text))
    }

    /// First visible character at `now`
    ///
    /// Wraps around after a blank step past the end.
    pub fn offset(&self, now: u64) -> usize {
        if !self.scrolls() {
            return 0;
        }
        let steps = self.text.chars().count() as u64 + 1;
        (now.saturating_sub(self.started) % steps) as usize
    }

    /// The part of the text visible at `now`
    pub fn window(&self, now: u64) -> &str {
        let offset = self.offset(now);
        match self.text.char_indices().nth(offset) {
            Some((i, _)) => &self.text[i..],
            None => "",
        }
    }

    /// Left edge: centred when it fits, flush left when scrolling
    pub fn x(&self) -> i32 {
        match self.font {
            Some(font) if font.fits(&self.text) => font.centered_x(&self.text),
            _ => 0,
        }
    }
}
