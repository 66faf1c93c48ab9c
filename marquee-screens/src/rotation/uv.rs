//! UV index: `{"index": 5.3}`

use marquee_core::data::{keys, Value};
use marquee_core::traits::{Screen, ScreenContext, ScreenError, ShowOutcome};
use marquee_display::{Color, Font};

use crate::layout::add_mini_clock;

/// UV screen
#[derive(Debug, Clone, Default)]
pub struct Uv;

impl Uv {
    pub fn new() -> Self {
        Self
    }
}

impl Screen for Uv {
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
        ctx.data.clear_updated(keys::UV);

        let Some(uv) = ctx.data.get_item(keys::UV) else {
            return Ok(ShowOutcome::NoData);
        };
        let Some(index) = uv.get("index").and_then(Value::as_f64) else {
            return Ok(ShowOutcome::Malformed);
        };
        // Truncated to one decimal place
        let tenths = (index * 10.0) as i64;
        if tenths == 0 {
            return Ok(ShowOutcome::NoData);
        }

        ctx.scene.clear();
        ctx.scene.add_label_fmt(
            format_args!("UVI {}.{}", tenths / 10, (tenths % 10).abs()),
            Font::Small,
            Color::PURPLE,
            0,
            7,
        )?;
        add_mini_clock(ctx.scene, ctx.clock)?;
        Ok(ShowOutcome::Shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::data::DataStore;
    use marquee_display::Scene;
    use serde_json::json;

    fn show(value: Value) -> (ShowOutcome, Scene) {
        let mut data = DataStore::new();
        data.set_item(keys::UV, value, 1);
        let mut scene = Scene::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 2);
        let outcome = Uv::new().show(&mut ctx).unwrap();
        assert!(!ctx.data.is_updated(keys::UV));
        (outcome, scene)
    }

    #[test]
    fn test_index_truncated() {
        let (outcome, scene) = show(json!({"index": 5.37}));
        assert_eq!(outcome, ShowOutcome::Shown);
        assert!(scene.has_text("UVI 5.3"));

        let (_, scene) = show(json!({"index": 7}));
        assert!(scene.has_text("UVI 7.0"));
    }

    #[test]
    fn test_zero_is_no_data() {
        assert_eq!(show(json!({"index": 0})).0, ShowOutcome::NoData);
    }

    #[test]
    fn test_missing_index_is_malformed() {
        assert_eq!(show(json!({"uv": 3})).0, ShowOutcome::Malformed);
    }

    #[test]
    fn test_absent_is_no_data() {
        let mut data = DataStore::new();
        let mut scene = Scene::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 2);
        assert_eq!(Uv::new().show(&mut ctx).unwrap(), ShowOutcome::NoData);
    }
}
