//! Images compiled into the firmware

use marquee_display::AssetSource;

/// BMP files under `assets/`, keyed by name without extension
static ASSETS: &[(&str, &[u8])] = &[
    ("nyan", include_bytes!("../assets/nyan.bmp")),
    ("wifi", include_bytes!("../assets/wifi.bmp")),
    ("w/cloudy", include_bytes!("../assets/w/cloudy.bmp")),
    ("w/rain", include_bytes!("../assets/w/rain.bmp")),
    ("w/snow", include_bytes!("../assets/w/snow.bmp")),
    ("w/sunny", include_bytes!("../assets/w/sunny.bmp")),
    ("w/thunder", include_bytes!("../assets/w/thunder.bmp")),
];

/// Asset table for the renderer
pub struct FirmwareAssets;

impl AssetSource for FirmwareAssets {
    fn asset(&self, name: &str) -> Option<&[u8]> {
        ASSETS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, bytes)| *bytes)
    }
}
