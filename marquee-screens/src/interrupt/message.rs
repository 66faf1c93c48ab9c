//! Operator message
//!
//! The `message` key holds `{"text": "...", "color": 0xRRGGBB}` with an
//! optional `"scroll": true` for long text.

use heapless::String;
use marquee_core::data::{keys, Value};
use marquee_core::traits::{Screen, ScreenContext, ScreenError, ShowOutcome};
use marquee_display::{Color, Font, LABEL_LEN};

use crate::layout::{middle_y, ScrollText};

/// Message screen
#[derive(Debug, Clone, Default)]
pub struct Message {
    line: ScrollText,
    color: Color,
    scroll: bool,
    drawn: Option<(usize, u32)>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    fn draw(&mut self, ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        let offset = if self.scroll {
            self.line.offset(ctx.now)
        } else {
            0
        };
        let text = if self.scroll {
            self.line.window(ctx.now)
        } else {
            self.line.text()
        };
        ctx.scene.clear();
        ctx.scene
            .add_label(text, Font::Small, self.color, self.line.x(), middle_y(Font::Small))?;
        self.drawn = Some((offset, ctx.scene.revision()));
        Ok(())
    }
}

impl Screen for Message {
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
        ctx.data.clear_updated(keys::MESSAGE);

        let Some(message) = ctx.data.get_item(keys::MESSAGE) else {
            return Ok(ShowOutcome::NoData);
        };
        let (Some(text), Some(color)) = (
            message.get("text").and_then(Value::as_str),
            message.get("color").and_then(Value::as_u64),
        ) else {
            return Ok(ShowOutcome::Malformed);
        };
        let scroll = message
            .get("scroll")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut copy: String<LABEL_LEN> = String::new();
        for ch in text.chars() {
            if copy.push(ch).is_err() {
                break;
            }
        }
        self.line.set(&copy, Font::Small, ctx.now);
        self.color = Color::from_payload(color);
        self.scroll = scroll;
        self.draw(ctx)?;
        Ok(ShowOutcome::Shown)
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        let offset = if self.scroll {
            self.line.offset(ctx.now)
        } else {
            0
        };
        if self.drawn != Some((offset, ctx.scene.revision())) {
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
    use serde_json::json;

    #[test]
    fn test_centred_in_colour() {
        let mut data = DataStore::new();
        data.set_item(keys::MESSAGE, json!({"text": "hello", "color": 0xFF0000}), 1);
        let mut scene = Scene::new();
        let mut message = Message::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 5);

        assert_eq!(message.show(&mut ctx).unwrap(), ShowOutcome::Shown);
        let label = ctx.scene.labels().next().unwrap();
        assert_eq!(label.text.as_str(), "hello");
        assert_eq!(label.color, Color::RED);
        assert_eq!(label.x, (64 - 30) / 2);
        assert_eq!(label.y, 11);
        assert!(!ctx.data.is_updated(keys::MESSAGE));
    }

    #[test]
    fn test_missing_color_is_malformed() {
        let mut data = DataStore::new();
        data.set_item(keys::MESSAGE, json!({"text": "hello"}), 1);
        let mut scene = Scene::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 5);
        assert_eq!(
            Message::new().show(&mut ctx).unwrap(),
            ShowOutcome::Malformed
        );
        assert!(!ctx.data.is_updated(keys::MESSAGE));
    }

    #[test]
    fn test_long_text_flush_left_without_scroll() {
        let mut data = DataStore::new();
        data.set_item(
            keys::MESSAGE,
            json!({"text": "meeting in room 4 at noon", "color": 255}),
            1,
        );
        let mut scene = Scene::new();
        let mut message = Message::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 5);
        message.show(&mut ctx).unwrap();

        ctx.now = 9;
        message.update(&mut ctx).unwrap();
        let label = ctx.scene.labels().next().unwrap();
        assert_eq!(label.x, 0);
        assert_eq!(label.text.as_str(), "meeting in room 4 at noon");
    }

    #[test]
    fn test_scrolling_text_advances() {
        let mut data = DataStore::new();
        data.set_item(
            keys::MESSAGE,
            json!({"text": "meeting in room 4 at noon", "color": 255, "scroll": true}),
            1,
        );
        let mut scene = Scene::new();
        let mut message = Message::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 5);
        message.show(&mut ctx).unwrap();

        ctx.now = 13;
        message.update(&mut ctx).unwrap();
        assert!(ctx.scene.has_text("in room 4 at noon"));
    }
}
