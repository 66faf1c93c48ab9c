//! Air quality index: `{"aqi": 42}`

use marquee_core::data::payload::as_int;
use marquee_core::data::keys;
use marquee_core::traits::{Screen, ScreenContext, ScreenError, ShowOutcome};
use marquee_display::{Color, Font};

use crate::layout::add_mini_clock;

/// EPA colour band for an index
pub fn aqi_color(aqi: i64) -> Color {
    match aqi {
        a if a > 300 => Color::MAROON,
        a if a > 200 => Color::PURPLE,
        a if a > 150 => Color::RED,
        a if a > 100 => Color::ORANGE,
        a if a > 50 => Color::YELLOW,
        _ => Color::GREEN,
    }
}

/// Air quality screen
#[derive(Debug, Clone, Default)]
pub struct Aqi;

impl Aqi {
    pub fn new() -> Self {
        Self
    }
}

impl Screen for Aqi {
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
        let Some(aqi) = ctx.data.get_item(keys::AQI) else {
            return Ok(ShowOutcome::NoData);
        };
        let index = aqi.get("aqi").and_then(as_int);
        ctx.data.clear_updated(keys::AQI);
        let Some(index) = index else {
            return Ok(ShowOutcome::Malformed);
        };

        ctx.scene.clear();
        ctx.scene.add_label_fmt(
            format_args!("AQI {}", index),
            Font::Small,
            aqi_color(index),
            0,
            7,
        )?;
        add_mini_clock(ctx.scene, ctx.clock)?;
        Ok(ShowOutcome::Shown)
    }
}
