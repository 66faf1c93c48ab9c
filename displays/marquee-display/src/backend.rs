//! Display backend trait
//!
//! Defines the interface for panels that can show a rendered frame.

use crate::raster::Framebuffer;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Display not initialized
    NotInitialized,
    /// Too many elements or text too long for a scene
    BufferOverflow,
    /// Scene references an image that is not in the asset table
    AssetNotFound,
    /// Image asset could not be decoded
    InvalidAsset,
}

/// Display backend trait
///
/// Implementations take a complete frame; partial updates are not
/// supported by HUB75 panels anyway since they are continuously scanned.
pub trait DisplayBackend {
    /// Show a complete frame
    fn present(&mut self, frame: &Framebuffer) -> Result<(), DisplayError>;

    /// Blank the panel
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Get the display dimensions in pixels (width, height)
    fn dimensions(&self) -> (u16, u16);

    /// Check if the display is ready
    fn is_ready(&self) -> bool;
}
