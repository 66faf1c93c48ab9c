//! Data screens in the regular rotation

pub mod aqi;
pub mod pollen;
pub mod uv;
pub mod weather;

pub use aqi::{aqi_color, Aqi};
pub use pollen::Pollen;
pub use uv::Uv;
pub use weather::{temperature_color, Weather};
