//! Full-panel clock

use marquee_core::data::Solar;
use marquee_core::traits::{
    ClockReading, ClockScreen, Screen, ScreenContext, ScreenError, ShowOutcome,
};
use marquee_display::Font;

use super::solar::{clock_color, is_sundown};
use super::timezone::TimezoneCache;
use crate::layout::middle_y;

/// The home screen: large `H:MM`, coloured by the sun
#[derive(Debug, Clone, Default)]
pub struct ClockFace {
    timezone: TimezoneCache,
    /// What is on the panel and the scene revision it was drawn at
    drawn: Option<(ClockReading, u32)>,
}

impl ClockFace {
    pub fn new() -> Self {
        Self::default()
    }

    fn draw(&mut self, ctx: &mut ScreenContext<'_>, reading: ClockReading) -> Result<(), ScreenError> {
        let text = reading.text();
        ctx.scene.clear();
        ctx.scene
            .add_centered_label(&text, Font::Large, reading.color, middle_y(Font::Large))?;
        self.drawn = Some((reading, ctx.scene.revision()));
        Ok(())
    }

    /// Whether the panel already shows `reading`
    fn is_current(&self, ctx: &ScreenContext<'_>, reading: &ClockReading) -> bool {
        match &self.drawn {
            Some((drawn, revision)) => {
                *revision == ctx.scene.revision()
                    && drawn.text() == reading.text()
                    && drawn.color == reading.color
            }
            None => false,
        }
    }
}

impl Screen for ClockFace {
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
        let reading = self.reading(ctx);
        self.draw(ctx, reading)?;
        Ok(ShowOutcome::Shown)
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        let reading = match ctx.clock {
            Some(reading) => reading,
            None => self.reading(ctx),
        };
        if !self.is_current(ctx, &reading) {
            self.draw(ctx, reading)?;
        }
        Ok(())
    }
}

impl ClockScreen for ClockFace {
    fn reading(&mut self, ctx: &mut ScreenContext<'_>) -> ClockReading {
        let offset = self.timezone.offset_at(ctx.data, ctx.now);
        let color = clock_color(Solar::from_store(ctx.data), ctx.now);
        let local = i64::try_from(ctx.now).unwrap_or(i64::MAX).saturating_add(offset);
        ClockReading::from_local_seconds(local, color)
    }

    fn is_sundown(&mut self, ctx: &mut ScreenContext<'_>) -> bool {
        is_sundown(Solar::from_store(ctx.data), ctx.now)
    }

    fn timezone_offset(&self) -> i64 {
        self.timezone.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::data::{keys, DataStore};
    use marquee_display::{Color, Scene};
    use serde_json::json;

    #[test]
    fn test_show_draws_centered_time() {
        let mut data = DataStore::new();
        let mut scene = Scene::new();
        let mut clock = ClockFace::new();
        // 09:05:01 UTC
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 9 * 3600 + 5 * 60 + 1);

        assert_eq!(clock.show(&mut ctx).unwrap(), ShowOutcome::Shown);
        let label = ctx.scene.labels().next().unwrap();
        assert_eq!(label.text.as_str(), "9:05");
        assert_eq!(label.color, Color::GREEN);
        assert_eq!(label.font, Font::Large);
        assert_eq!(label.x, (64 - 40) / 2);
    }

    #[test]
    fn test_timezone_applied() {
        let mut data = DataStore::new();
        data.set_item(
            keys::TIMEZONE,
            json!({"transitions": [{"timestamp": 0, "offset": -7 * 3600}]}),
            0,
        );
        let mut scene = Scene::new();
        let mut clock = ClockFace::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 20 * 3600);

        let reading = clock.reading(&mut ctx);
        assert_eq!(reading.hour, 13);
        assert_eq!(clock.timezone_offset(), -7 * 3600);
    }

    #[test]
    fn test_update_redraws_only_on_change() {
        let mut data = DataStore::new();
        let mut scene = Scene::new();
        let mut clock = ClockFace::new();

        let mut ctx = ScreenContext::new(&mut data, &mut scene, 1);
        clock.update(&mut ctx).unwrap();
        let first = ctx.scene.revision();

        // Same second: nothing to do
        clock.update(&mut ctx).unwrap();
        assert_eq!(ctx.scene.revision(), first);

        // Colon blinks off
        ctx.now = 2;
        clock.update(&mut ctx).unwrap();
        assert_eq!(ctx.scene.revision(), first + 1);
        assert!(ctx.scene.has_text("0 00"));
    }

    #[test]
    fn test_update_redraws_after_other_screen() {
        let mut data = DataStore::new();
        let mut scene = Scene::new();
        let mut clock = ClockFace::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 1);
        clock.update(&mut ctx).unwrap();

        ctx.scene.clear();
        ctx.scene
            .add_label("AQI 12", Font::Small, Color::GREEN, 0, 7)
            .unwrap();
        clock.update(&mut ctx).unwrap();
        assert!(ctx.scene.has_text("0:00"));
        assert!(!ctx.scene.has_text("AQI 12"));
    }

    #[test]
    fn test_sundown_needs_solar() {
        let mut data = DataStore::new();
        let mut scene = Scene::new();
        let mut clock = ClockFace::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 50_000);
        assert!(!clock.is_sundown(&mut ctx));

        ctx.data
            .set_item(keys::SOLAR, json!({"sunrise": 100_000, "sunset": 49_000}), 1);
        assert!(clock.is_sundown(&mut ctx));
        assert_eq!(clock.reading(&mut ctx).color, Color::RED);
    }
}
