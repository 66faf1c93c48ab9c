//! Configuration type definitions

use heapless::String;

use crate::data::NtpSettings;
use crate::state::{Rotation, ScreenId};

/// Maximum asset name length in configuration
pub const MAX_ASSET_LEN: usize = 32;

/// Maximum host name length in configuration
pub const MAX_HOST_LEN: usize = 64;

/// Maximum MQTT client id and topic prefix length
pub const MAX_MQTT_NAME_LEN: usize = 32;

/// Countdown budgets for the rotation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotationConfig {
    pub clock_s: u64,
    pub weather_s: u64,
    pub aqi_s: u64,
    pub uvi_s: u64,
    pub pollen_s: u64,
    /// Visit Pollen after UV
    pub include_pollen: bool,
    /// Data older than this is skipped
    pub stale_after_s: u64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            clock_s: 20,
            weather_s: 10,
            aqi_s: 10,
            uvi_s: 20,
            pollen_s: 10,
            include_pollen: false,
            stale_after_s: 60 * 60,
        }
    }
}

/// Countdown budgets for screens that preempt the rotation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptConfig {
    pub greet_s: u64,
    pub message_s: u64,
    pub ip_address_s: u64,
    pub splash_s: u64,
}

impl Default for InterruptConfig {
    fn default() -> Self {
        Self {
            greet_s: 15,
            message_s: 15,
            ip_address_s: 10,
            splash_s: 10,
        }
    }
}

/// Button timing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    pub debounce_ms: u64,
    /// Hold time for the halt (A) and reboot (B) gestures
    pub long_press_ms: u64,
    pub reboot_delay_s: u64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 20,
            long_press_ms: 3000,
            reboot_delay_s: 5,
        }
    }
}

/// Heap watermark
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryConfig {
    pub low_water_bytes: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            low_water_bytes: 10_000,
        }
    }
}

/// Network services
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkConfig {
    pub http_port: u16,
    /// NTP server used until the `ntp` key overrides it
    pub ntp_server: String<MAX_HOST_LEN>,
    pub ntp_refresh_s: u64,
    /// MQTT broker host; empty disables MQTT
    pub mqtt_broker: String<MAX_HOST_LEN>,
    pub mqtt_port: u16,
    /// Topics are `<prefix>/all/module/<key>`
    pub mqtt_topic_prefix: String<MAX_MQTT_NAME_LEN>,
    pub mqtt_client_id: String<MAX_MQTT_NAME_LEN>,
    /// Syslog server host; empty disables syslog
    pub syslog_server: String<MAX_HOST_LEN>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let mut ntp_server = String::new();
        let _ = ntp_server.push_str("pool.ntp.org");
        let mut mqtt_topic_prefix = String::new();
        let _ = mqtt_topic_prefix.push_str("givemeasign");
        let mut mqtt_client_id = String::new();
        let _ = mqtt_client_id.push_str("marquee");
        Self {
            http_port: 80,
            ntp_server,
            ntp_refresh_s: 6 * 60 * 60,
            mqtt_broker: String::new(),
            mqtt_port: 1883,
            mqtt_topic_prefix,
            mqtt_client_id,
            syslog_server: String::new(),
        }
    }
}

impl NetworkConfig {
    /// Whether an MQTT broker is configured
    pub fn mqtt_enabled(&self) -> bool {
        !self.mqtt_broker.is_empty()
    }

    /// Whether a syslog server is configured
    pub fn syslog_enabled(&self) -> bool {
        !self.syslog_server.is_empty()
    }

    /// NTP settings before any `ntp` key has been pushed
    pub fn ntp_defaults(&self) -> NtpSettings {
        NtpSettings {
            refresh_interval_s: self.ntp_refresh_s,
            server: self.ntp_server.clone(),
        }
    }
}

/// Panel assets and overlays
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Image shown on button B
    pub splash_asset: String<MAX_ASSET_LEN>,
    /// Image shown while WiFi comes up
    pub wifi_asset: String<MAX_ASSET_LEN>,
    /// Show network state in the top-right pixel
    pub status_pixel: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut splash_asset = String::new();
        let _ = splash_asset.push_str("nyan");
        let mut wifi_asset = String::new();
        let _ = wifi_asset.push_str("wifi");
        Self {
            splash_asset,
            wifi_asset,
            status_pixel: true,
        }
    }
}

/// Complete sign configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignConfig {
    pub rotation: RotationConfig,
    pub interrupt: InterruptConfig,
    pub buttons: ButtonConfig,
    pub memory: MemoryConfig,
    pub network: NetworkConfig,
    pub display: DisplayConfig,
}

impl SignConfig {
    /// Countdown for a screen when it becomes current
    pub fn budget(&self, screen: ScreenId) -> u64 {
        match screen {
            ScreenId::Clock | ScreenId::Trimet => self.rotation.clock_s,
            ScreenId::Weather => self.rotation.weather_s,
            ScreenId::Aqi => self.rotation.aqi_s,
            ScreenId::Uvi => self.rotation.uvi_s,
            ScreenId::Pollen => self.rotation.pollen_s,
            ScreenId::Greet => self.interrupt.greet_s,
            ScreenId::Message => self.interrupt.message_s,
            ScreenId::IpAddress => self.interrupt.ip_address_s,
            ScreenId::Splash => self.interrupt.splash_s,
        }
    }

    /// Rotation options for the transition table
    pub fn rotation_options(&self) -> Rotation {
        Rotation {
            include_pollen: self.rotation.include_pollen,
        }
    }
}
