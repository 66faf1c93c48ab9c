//! Key-value data store
//!
//! Every topic pushed to the sign lands here. Screens and the scheduler
//! read values, dirty flags and ages; only the application task writes.

pub mod ingest;
pub mod payload;
pub mod record;
pub mod store;

pub use ingest::{parse_document, parse_set_time, IngestError, MAX_DOCUMENT_SIZE};
pub use payload::{debug_enabled, NtpSettings, Solar};
pub use record::DataRecord;
pub use store::{DataStore, PersistError, UNKNOWN_AGE};

pub use serde_json::Value;

/// Well-known data store keys read by the core
pub mod keys {
    pub const AQI: &str = "aqi";
    pub const DEBUG: &str = "debug";
    pub const GREET: &str = "greet";
    pub const MESSAGE: &str = "message";
    pub const NTP: &str = "ntp";
    pub const POLLEN: &str = "pollen";
    pub const SOLAR: &str = "solar";
    pub const TIMEZONE: &str = "timezone";
    pub const TONES: &str = "tones";
    pub const UV: &str = "uv";
    pub const WEATHER: &str = "weather";
}
