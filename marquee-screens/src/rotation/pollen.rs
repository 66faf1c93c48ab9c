//! Pollen count: `{"pollen": 7}`

use marquee_core::data::payload::as_int;
use marquee_core::data::keys;
use marquee_core::traits::{Screen, ScreenContext, ScreenError, ShowOutcome};
use marquee_display::{Color, Font};

/// Pollen screen
#[derive(Debug, Clone, Default)]
pub struct Pollen;

impl Pollen {
    pub fn new() -> Self {
        Self
    }
}

impl Screen for Pollen {
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
        let Some(pollen) = ctx.data.get_item(keys::POLLEN) else {
            return Ok(ShowOutcome::NoData);
        };
        let count = pollen.get("pollen").and_then(as_int);
        ctx.data.clear_updated(keys::POLLEN);
        let Some(count) = count else {
            return Ok(ShowOutcome::Malformed);
        };

        ctx.scene.clear();
        ctx.scene.add_label_fmt(
            format_args!("Pollen {}", count),
            Font::Small,
            Color::PURPLE,
            0,
            7,
        )?;
        Ok(ShowOutcome::Shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::data::DataStore;
    use marquee_display::Scene;
    use serde_json::json;

    #[test]
    fn test_shows_count() {
        let mut data = DataStore::new();
        data.set_item(keys::POLLEN, json!({"pollen": 9.8}), 1);
        let mut scene = Scene::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 2);
        assert_eq!(Pollen::new().show(&mut ctx).unwrap(), ShowOutcome::Shown);
        assert!(ctx.scene.has_text("Pollen 9"));
    }

    #[test]
    fn test_absent_and_malformed() {
        let mut data = DataStore::new();
        let mut scene = Scene::new();
        let mut ctx = ScreenContext::new(&mut data, &mut scene, 2);
        assert_eq!(Pollen::new().show(&mut ctx).unwrap(), ShowOutcome::NoData);

        ctx.data.set_item(keys::POLLEN, json!({"count": 3}), 1);
        assert_eq!(Pollen::new().show(&mut ctx).unwrap(), ShowOutcome::Malformed);
    }
}
