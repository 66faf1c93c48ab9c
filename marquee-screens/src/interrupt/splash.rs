//! Splash image

use heapless::String;
use marquee_core::config::MAX_ASSET_LEN;
use marquee_core::traits::{Screen, ScreenContext, ScreenError, ShowOutcome};

/// Full-panel image from the asset table
#[derive(Debug, Clone)]
pub struct Splash {
    asset: String<MAX_ASSET_LEN>,
}

impl Splash {
    pub fn new(asset: &str) -> Self {
        let mut name = String::new();
        for ch in asset.chars() {
            if name.push(ch).is_err() {
                break;
            }
        }
        Self { asset: name }
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }
}

impl Screen for Splash {
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
        ctx.scene.clear();
        ctx.scene.add_image(&self.asset, 0, 0)?;
        Ok(ShowOutcome::Shown)
    }
}
