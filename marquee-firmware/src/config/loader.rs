//! Configuration persistence
//!
//! Loads the sign configuration from flash storage.
//! Falls back to embedded defaults if flash is empty or invalid.

use core::str;
use defmt::*;

use marquee_core::config::{parse_config, ParseError, SignConfig};
use marquee_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey};
// Import the FlashStorage trait to bring methods into scope
use marquee_hal_rp2040::FlashStorageTrait;

/// Embedded default configuration (compiled into firmware)
/// Edit sign.toml and rebuild to customize
pub const EMBEDDED_CONFIG: &str = include_str!("../../sign.toml");

/// Maximum TOML config size
const MAX_TOML_SIZE: usize = 2048;

/// Configuration loading errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// TOML parsing failed
    Parse(ParseError),
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}

/// Load the configuration: flash, then embedded, then built-in defaults
pub async fn load_config(storage: &mut FlashStorage<'_>) -> SignConfig {
    match load_from_flash(storage).await {
        Ok(config) => {
            info!("Loaded configuration from flash");
            return config;
        }
        Err(ConfigError::Flash(FlashError::NotFound)) => {
            debug!("No configuration in flash");
        }
        Err(e) => {
            warn!("Stored configuration unusable: {:?}", e);
        }
    }

    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Using embedded configuration");
            config
        }
        Err(e) => {
            // Only reachable if build.rs and the runtime parser disagree
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in defaults");
            SignConfig::default()
        }
    }
}

async fn load_from_flash(storage: &mut FlashStorage<'_>) -> Result<SignConfig, ConfigError> {
    let mut buffer = [0u8; MAX_TOML_SIZE];
    let len = storage.read(StorageKey::SignConfig, &mut buffer).await?;
    debug!("Read {} bytes of TOML from flash", len);

    let text = str::from_utf8(&buffer[..len]).map_err(|_| ConfigError::InvalidUtf8)?;
    let config = parse_config(text)?;
    log_config_summary(&config);
    Ok(config)
}

/// Log the settings most likely to differ from the defaults
pub fn log_config_summary(config: &SignConfig) {
    info!(
        "Rotation: clock={}s weather={}s aqi={}s uvi={}s pollen={} stale after {}s",
        config.rotation.clock_s,
        config.rotation.weather_s,
        config.rotation.aqi_s,
        config.rotation.uvi_s,
        config.rotation.include_pollen,
        config.rotation.stale_after_s
    );
    info!(
        "Network: http port {} ntp {} every {}s",
        config.network.http_port,
        config.network.ntp_server.as_str(),
        config.network.ntp_refresh_s
    );
}
