//! Current conditions and forecast
//!
//! ```json
//! {"current": {"conditions": "sunny", "temperature": 79, "humidity": 45},
//!  "forecast": {"low": 55, "high": 81}}
//! ```
//!
//! Numbers may be floats and are truncated. The condition names an icon
//! in the asset table under `w/`.

use core::fmt::Write;

use heapless::String;
use marquee_core::data::payload::{as_int, field};
use marquee_core::data::{keys, Value};
use marquee_core::traits::{Screen, ScreenContext, ScreenError, ShowOutcome};
use marquee_display::{Color, Font};

/// Colour for a temperature in °F
pub fn temperature_color(temp_f: i64) -> Color {
    match temp_f {
        t if t < 50 => Color::BLUE,
        t if t < 70 => Color::TEAL,
        t if t > 89 => Color::RED,
        t if t > 79 => Color::ORANGE,
        _ => Color::GREEN,
    }
}

struct Reading {
    icon: String<32>,
    temperature: i64,
    humidity: i64,
    low: i64,
    high: i64,
}

impl Reading {
    fn from_value(weather: &Value) -> Option<Self> {
        let conditions = field(weather, &["current", "conditions"]).and_then(Value::as_str)?;
        let mut icon = String::new();
        write!(icon, "w/{}", conditions).ok()?;
        Some(Self {
            icon,
            temperature: field(weather, &["current", "temperature"]).and_then(as_int)?,
            humidity: field(weather, &["current", "humidity"]).and_then(as_int)?,
            low: field(weather, &["forecast", "low"]).and_then(as_int)?,
            high: field(weather, &["forecast", "high"]).and_then(as_int)?,
        })
    }
}

/// Weather screen
#[derive(Debug, Clone, Default)]
pub struct Weather;

impl Weather {
    pub fn new() -> Self {
        Self
    }
}

impl Screen for Weather {
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
        let Some(weather) = ctx.data.get_item(keys::WEATHER) else {
            return Ok(ShowOutcome::NoData);
        };
        let reading = Reading::from_value(weather);
        ctx.data.clear_updated(keys::WEATHER);
        let Some(reading) = reading else {
            return Ok(ShowOutcome::Malformed);
        };

        ctx.scene.clear();
        ctx.scene.add_image(&reading.icon, 0, 0)?;
        ctx.scene.add_label_fmt(
            format_args!("{}", reading.temperature),
            Font::Small,
            temperature_color(reading.temperature),
            40,
            5,
        )?;
        ctx.scene.add_label_fmt(
            format_args!("{}% {}->{}", reading.humidity, reading.low, reading.high),
            Font::Small,
            Color::GREEN,
            0,
            19,
        )?;
        Ok(ShowOutcome::Shown)
    }
}
