//! Configuration loading
//!
//! Runtime configuration comes from flash when present, otherwise from the
//! `sign.toml` compiled into the image.

pub mod loader;

pub use loader::{load_config, ConfigError, EMBEDDED_CONFIG};
