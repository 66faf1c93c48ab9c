//! Display model and rendering for the Marquee LED matrix
//!
//! This crate provides:
//! - `Scene` - what a screen wants on the panel (text labels and images)
//! - `Color` and `Font` - the palette and the three type sizes screens use
//! - `Framebuffer` and `render` - rasterizes a scene with embedded-graphics
//! - `DisplayBackend` trait - pushes a finished frame to hardware
//!
//! # Architecture
//!
//! Screens never touch pixels. They describe a `Scene`; the firmware
//! renders the scene into a `Framebuffer` whenever it is dirty and hands
//! the frame to a backend (the HUB75 scan-out on the RP2040 board).

#![no_std]

pub mod backend;
pub mod color;
pub mod font;
pub mod raster;
pub mod scene;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use color::Color;
pub use font::Font;
pub use raster::{render, AssetSource, Framebuffer, NoAssets};
pub use scene::{Element, ImageRef, Label, Scene, LABEL_LEN, MAX_ELEMENTS};

/// Panel width in pixels
pub const PANEL_WIDTH: usize = 64;

/// Panel height in pixels
pub const PANEL_HEIGHT: usize = 32;
