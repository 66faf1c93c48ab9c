//! Typed views of well-known payloads
//!
//! Payloads arrive as arbitrary JSON; numbers may be integers or floats.

use heapless::String;
use serde_json::Value;

use super::keys;
use super::store::DataStore;

/// Read a non-negative number of seconds, truncating fractions
pub fn as_seconds(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

/// Read a signed integer, truncating fractions
pub fn as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// Follow a path of object keys
pub fn field<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

/// Sunrise and sunset for the current day, unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Solar {
    pub sunrise: u64,
    pub sunset: u64,
}

impl Solar {
    /// Decode `{"sunrise": epoch, "sunset": epoch}`
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            sunrise: value.get("sunrise").and_then(as_seconds)?,
            sunset: value.get("sunset").and_then(as_seconds)?,
        })
    }

    /// Read the `solar` key
    pub fn from_store(store: &mut DataStore) -> Option<Self> {
        store.get_item(keys::SOLAR).and_then(Self::from_value)
    }
}

/// Maximum NTP server host name length
pub const NTP_SERVER_LEN: usize = 64;

/// NTP client settings from the `ntp` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NtpSettings {
    /// Seconds between syncs; 0 syncs only once at boot
    pub refresh_interval_s: u64,
    pub server: String<NTP_SERVER_LEN>,
}

impl NtpSettings {
    /// Decode `{"refresh_interval": secs, "server": host}`, taking
    /// missing or unusable fields from `defaults`
    pub fn from_value(value: Option<&Value>, defaults: &NtpSettings) -> Self {
        let mut settings = defaults.clone();
        let Some(value) = value else {
            return settings;
        };
        if let Some(interval) = value.get("refresh_interval").and_then(as_seconds) {
            settings.refresh_interval_s = interval;
        }
        if let Some(server) = value.get("server").and_then(Value::as_str) {
            let mut host = String::new();
            if host.push_str(server).is_ok() && !server.is_empty() {
                settings.server = host;
            }
        }
        settings
    }
}

/// The `debug.debug` flag, false when absent or not a boolean
pub fn debug_enabled(store: &mut DataStore) -> bool {
    store
        .get_item(keys::DEBUG)
        .and_then(|v| v.get("debug"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
