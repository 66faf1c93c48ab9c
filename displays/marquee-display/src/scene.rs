//! Scene description
//!
//! A scene is the retained content of the panel: a handful of text labels
//! and images plus the status pixel. Screens rebuild it; the firmware
//! re-renders only when it is dirty.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::backend::DisplayError;
use crate::color::Color;
use crate::font::Font;

/// Maximum elements in one scene
pub const MAX_ELEMENTS: usize = 8;

/// Maximum characters per label
pub const LABEL_LEN: usize = 64;

/// Maximum length of an image asset name
pub const ASSET_NAME_LEN: usize = 32;

/// A line of text
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Label {
    pub text: String<LABEL_LEN>,
    pub font: Font,
    pub color: Color,
    /// Left edge in pixels (may be negative while scrolling)
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
}

/// An image placed from the asset table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageRef {
    pub asset: String<ASSET_NAME_LEN>,
    pub x: i32,
    pub y: i32,
}

/// One drawable element
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    Label(Label),
    Image(ImageRef),
}

/// Retained panel content
#[derive(Debug, Clone)]
pub struct Scene {
    elements: Vec<Element, MAX_ELEMENTS>,
    /// Overlay for the top-right pixel (network status)
    status: Option<Color>,
    /// Incremented on every clear, so screens can tell when someone else drew
    revision: u32,
    dirty: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            status: None,
            revision: 0,
            dirty: true,
        }
    }

    /// Remove every element (the status pixel is kept)
    pub fn clear(&mut self) {
        self.elements.clear();
        self.revision = self.revision.wrapping_add(1);
        self.dirty = true;
    }

    /// Add a label, truncating text that does not fit the label buffer
    pub fn add_label(
        &mut self,
        text: &str,
        font: Font,
        color: Color,
        x: i32,
        y: i32,
    ) -> Result<(), DisplayError> {
        let mut buf: String<LABEL_LEN> = String::new();
        for ch in text.chars() {
            if buf.push(ch).is_err() {
                break;
            }
        }
        self.push(Element::Label(Label {
            text: buf,
            font,
            color,
            x,
            y,
        }))
    }

    /// Add a label horizontally centred on the panel
    pub fn add_centered_label(
        &mut self,
        text: &str,
        font: Font,
        color: Color,
        y: i32,
    ) -> Result<(), DisplayError> {
        self.add_label(text, font, color, font.centered_x(text), y)
    }

    /// Add a label from format arguments
    pub fn add_label_fmt(
        &mut self,
        args: core::fmt::Arguments<'_>,
        font: Font,
        color: Color,
        x: i32,
        y: i32,
    ) -> Result<(), DisplayError> {
        let mut buf: String<LABEL_LEN> = String::new();
        buf.write_fmt(args).map_err(|_| DisplayError::BufferOverflow)?;
        self.add_label(&buf, font, color, x, y)
    }

    /// Add an image by asset name
    pub fn add_image(&mut self, asset: &str, x: i32, y: i32) -> Result<(), DisplayError> {
        let mut name: String<ASSET_NAME_LEN> = String::new();
        name.push_str(asset)
            .map_err(|_| DisplayError::BufferOverflow)?;
        self.push(Element::Image(ImageRef { asset: name, x, y }))
    }

    fn push(&mut self, element: Element) -> Result<(), DisplayError> {
        self.elements
            .push(element)
            .map_err(|_| DisplayError::BufferOverflow)?;
        self.dirty = true;
        Ok(())
    }

    /// Set or clear the status pixel overlay
    pub fn set_status(&mut self, status: Option<Color>) {
        if self.status != status {
            self.status = status;
            self.dirty = true;
        }
    }

    /// Current status pixel overlay
    pub fn status(&self) -> Option<Color> {
        self.status
    }

    /// All elements in draw order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Iterate over the labels only
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.elements.iter().filter_map(|e| match e {
            Element::Label(label) => Some(label),
            Element::Image(_) => None,
        })
    }

    /// Whether any label shows exactly `text`
    pub fn has_text(&self, text: &str) -> bool {
        self.labels().any(|l| l.text.as_str() == text)
    }

    /// Whether the scene holds no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Clear counter
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Check if the scene needs rendering
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark scene as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Mark scene as dirty (needs rendering)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Scene {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Scene[");
        for (i, label) in self.labels().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", label.text.as_str());
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_bumps_revision() {
        let mut scene = Scene::new();
        let before = scene.revision();
        scene.add_label("hi", Font::Small, Color::WHITE, 0, 0).unwrap();
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.revision(), before + 1);
        assert!(scene.is_dirty());
    }

    #[test]
    fn test_long_text_is_truncated() {
        let mut scene = Scene::new();
        let long = [b'x'; LABEL_LEN + 10];
        let long = core::str::from_utf8(&long).unwrap();
        scene.add_label(long, Font::Small, Color::WHITE, 0, 0).unwrap();
        let label = scene.labels().next().unwrap();
        assert_eq!(label.text.len(), LABEL_LEN);
    }

    #[test]
    fn test_capacity_overflow() {
        let mut scene = Scene::new();
        for _ in 0..MAX_ELEMENTS {
            scene.add_image("nyan", 0, 0).unwrap();
        }
        assert_eq!(
            scene.add_image("nyan", 0, 0),
            Err(DisplayError::BufferOverflow)
        );
    }

    #[test]
    fn test_status_only_dirties_on_change() {
        let mut scene = Scene::new();
        scene.set_status(Some(Color::RED));
        scene.mark_clean();
        scene.set_status(Some(Color::RED));
        assert!(!scene.is_dirty());
        scene.set_status(None);
        assert!(scene.is_dirty());
    }

    #[test]
    fn test_centered_label_position() {
        let mut scene = Scene::new();
        scene
            .add_centered_label("12:34", Font::Large, Color::GREEN, 6)
            .unwrap();
        let label = scene.labels().next().unwrap();
        assert_eq!(label.x, 7);
        assert!(scene.has_text("12:34"));
    }
}
