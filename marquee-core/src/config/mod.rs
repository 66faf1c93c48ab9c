//! Sign configuration
//!
//! `sign.toml` is embedded in the firmware image and parsed at boot with
//! a small line-based parser; build.rs validates it with a full TOML
//! parser on the host.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
