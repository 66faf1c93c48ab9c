//! Scene rasterizer
//!
//! Renders a [`Scene`] into a 64x32 RGB framebuffer using embedded-graphics
//! mono fonts and tinybmp images.

use embedded_graphics::image::Image;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use tinybmp::Bmp;

use crate::backend::DisplayError;
use crate::color::Color;
use crate::scene::{Element, ImageRef, Scene};
use crate::{PANEL_HEIGHT, PANEL_WIDTH};

/// Lookup of BMP image data by asset name
pub trait AssetSource {
    /// Raw BMP file bytes for `name`, if present
    fn asset(&self, name: &str) -> Option<&[u8]>;
}

/// Asset source with no images
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn asset(&self, _name: &str) -> Option<&[u8]> {
        None
    }
}

/// Full-panel frame in 24-bit colour
#[derive(Clone)]
pub struct Framebuffer {
    pixels: [[Color; PANEL_WIDTH]; PANEL_HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Create a blank frame
    pub const fn new() -> Self {
        Self {
            pixels: [[Color::BLACK; PANEL_WIDTH]; PANEL_HEIGHT],
        }
    }

    /// Blank every pixel
    pub fn clear(&mut self) {
        self.pixels = [[Color::BLACK; PANEL_WIDTH]; PANEL_HEIGHT];
    }

    /// Pixel at (x, y); black outside the panel
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(Color::BLACK)
    }

    /// Set a pixel, ignoring coordinates outside the panel
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if let Some(px) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *px = color;
        }
    }

    /// One row of pixels
    pub fn row(&self, y: usize) -> &[Color; PANEL_WIDTH] {
        &self.pixels[y.min(PANEL_HEIGHT - 1)]
    }

    /// Number of pixels that are not black
    pub fn lit_count(&self) -> usize {
        self.pixels
            .iter()
            .flat_map(|row| row.iter())
            .filter(|c| !c.is_off())
            .count()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH as u32, PANEL_HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                self.set_pixel(x, y, color.into());
            }
        }
        Ok(())
    }
}

/// Render `scene` into `frame`
///
/// Every element is drawn even when an image fails; the first image
/// error is returned afterwards.
pub fn render(
    scene: &Scene,
    frame: &mut Framebuffer,
    assets: &impl AssetSource,
) -> Result<(), DisplayError> {
    frame.clear();
    let mut result = Ok(());

    for element in scene.elements() {
        match element {
            Element::Label(label) => {
                let style = MonoTextStyle::new(label.font.mono(), label.color.into());
                let origin = Point::new(label.x, label.y);
                let _ = Text::with_baseline(&label.text, origin, style, Baseline::Top).draw(frame);
            }
            Element::Image(image) => {
                if let Err(e) = draw_image(frame, image, assets) {
                    if result.is_ok() {
                        result = Err(e);
                    }
                }
            }
        }
    }

    if let Some(status) = scene.status() {
        frame.set_pixel(PANEL_WIDTH - 1, 0, status);
    }

    result
}

fn draw_image(
    frame: &mut Framebuffer,
    image: &ImageRef,
    assets: &impl AssetSource,
) -> Result<(), DisplayError> {
    let bytes = assets
        .asset(&image.asset)
        .ok_or(DisplayError::AssetNotFound)?;
    let bmp: Bmp<Rgb888> = Bmp::from_slice(bytes).map_err(|_| DisplayError::InvalidAsset)?;
    let _ = Image::new(&bmp, Point::new(image.x, image.y)).draw(frame);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Font;

    /// 1x1 24-bit BMP holding a single red pixel
    const RED_DOT: [u8; 58] = [
        b'B', b'M', 58, 0, 0, 0, 0, 0, 0, 0, 54, 0, 0, 0, // file header
        40, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 24, 0, // info header
        0, 0, 0, 0, 4, 0, 0, 0, 0x13, 0x0B, 0, 0, 0x13, 0x0B, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, //
        0x00, 0x00, 0xFF, 0x00, // BGR + row padding
    ];

    struct OneAsset;

    impl AssetSource for OneAsset {
        fn asset(&self, name: &str) -> Option<&[u8]> {
            (name == "dot").then_some(&RED_DOT[..])
        }
    }

    #[test]
    fn test_label_lights_pixels_in_its_color() {
        let mut scene = Scene::new();
        scene.add_label("8", Font::Small, Color::BLUE, 0, 0).unwrap();
        let mut frame = Framebuffer::new();
        render(&scene, &mut frame, &NoAssets).unwrap();

        assert!(frame.lit_count() > 0);
        for y in 0..PANEL_HEIGHT {
            for x in 0..PANEL_WIDTH {
                let px = frame.pixel(x, y);
                assert!(px.is_off() || px == Color::BLUE);
                if x >= 6 || y >= 10 {
                    assert!(px.is_off());
                }
            }
        }
    }

    #[test]
    fn test_missing_asset_still_draws_text() {
        let mut scene = Scene::new();
        scene.add_image("nyan", 0, 0).unwrap();
        scene.add_label("1", Font::Small, Color::WHITE, 0, 0).unwrap();
        let mut frame = Framebuffer::new();

        assert_eq!(
            render(&scene, &mut frame, &NoAssets),
            Err(DisplayError::AssetNotFound)
        );
        assert!(frame.lit_count() > 0);
    }

    #[test]
    fn test_bmp_asset_is_drawn() {
        let mut scene = Scene::new();
        scene.add_image("dot", 3, 2).unwrap();
        let mut frame = Framebuffer::new();
        render(&scene, &mut frame, &OneAsset).unwrap();

        assert_eq!(frame.pixel(3, 2), Color::RED);
        assert_eq!(frame.lit_count(), 1);
    }

    #[test]
    fn test_status_pixel_overlay() {
        let mut scene = Scene::new();
        scene.set_status(Some(Color::RED));
        let mut frame = Framebuffer::new();
        render(&scene, &mut frame, &NoAssets).unwrap();

        assert_eq!(frame.pixel(PANEL_WIDTH - 1, 0), Color::RED);
        assert_eq!(frame.lit_count(), 1);
    }

    #[test]
    fn test_offscreen_text_is_clipped() {
        let mut scene = Scene::new();
        scene.add_label("abc", Font::Small, Color::WHITE, -100, 0).unwrap();
        let mut frame = Framebuffer::new();
        render(&scene, &mut frame, &NoAssets).unwrap();
        assert_eq!(frame.lit_count(), 0);
    }
}
