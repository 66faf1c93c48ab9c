//! Network address screen

use core::fmt::Write;

use heapless::String;
use marquee_core::traits::{Screen, ScreenContext, ScreenError, ShowOutcome};
use marquee_display::{Color, Font};

use crate::layout::{middle_y, ScrollText};

/// Longest dotted-quad plus port
const ADDRESS_LEN: usize = 24;

/// Shows the sign's own address, scrolling when it is too wide
#[derive(Debug, Clone, Default)]
pub struct IpAddress {
    address: Option<String<ADDRESS_LEN>>,
    line: ScrollText,
    drawn_offset: Option<(usize, u32)>,
}

impl IpAddress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the address once the network is up (`None` when it drops)
    pub fn set_address(&mut self, address: Option<[u8; 4]>) {
        self.address = address.map(|[a, b, c, d]| {
            let mut text = String::new();
            let _ = write!(text, "{}.{}.{}.{}", a, b, c, d);
            text
        });
    }

    /// Text shown on the panel
    pub fn text(&self) -> &str {
        match &self.address {
            Some(address) => address,
            None => "no network",
        }
    }

    fn draw(&mut self, ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        let offset = self.line.offset(ctx.now);
        ctx.scene.clear();
        ctx.scene.add_label(
            self.line.window(ctx.now),
            Font::Small,
            Color::GREEN,
            self.line.x(),
            middle_y(Font::Small),
        )?;
        self.drawn_offset = Some((offset, ctx.scene.revision()));
        Ok(())
    }
}

impl Screen for IpAddress {
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
        // Held button re-shows every tick; keep scrolling instead of restarting
        let text = self.text();
        if self.line.text() != text {
            let mut copy: String<ADDRESS_LEN> = String::new();
            let _ = copy.push_str(text);
            self.line.set(&copy, Font::Small, ctx.now);
        }
        self.draw(ctx)?;
        Ok(ShowOutcome::Shown)
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        let current = Some((self.line.offset(ctx.now), ctx.scene.revision()));
        if current != self.drawn_offset {
            self.draw(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::data::DataStore;
    use marquee_display::Scene;

    #[test]
    fn test_no_address() {
        let mut data = DataStore::new();
        let mut scene = Scene::new();
        let mut ip = IpAddress::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 0);
        assert_eq!(ip.show(&mut ctx).unwrap(), ShowOutcome::Shown);
        assert!(ctx.scene.has_text("no network"));
    }

    #[test]
    fn test_short_address_centred() {
        let mut data = DataStore::new();
        let mut scene = Scene::new();
        let mut ip = IpAddress::new();
        ip.set_address(Some([10, 0, 0, 7]));
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 0);
        ip.show(&mut ctx).unwrap();

        let label = ctx.scene.labels().next().unwrap();
        assert_eq!(label.text.as_str(), "10.0.0.7");
        assert_eq!(label.x, (64 - 8 * 6) / 2);
        assert_eq!(label.color, Color::GREEN);
    }

    #[test]
    fn test_long_address_scrolls() {
        let mut data = DataStore::new();
        let mut scene = Scene::new();
        let mut ip = IpAddress::new();
        ip.set_address(Some([192, 168, 100, 200]));
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 100);
        ip.show(&mut ctx).unwrap();
        assert!(ctx.scene.has_text("192.168.100.200"));

        // Re-shown while the button is held: scrolling continues
        ctx.now = 101;
        ip.show(&mut ctx).unwrap();
        assert!(ctx.scene.has_text("92.168.100.200"));

        ctx.now = 104;
        ip.update(&mut ctx).unwrap();
        assert!(ctx.scene.has_text("168.100.200"));
    }
}
