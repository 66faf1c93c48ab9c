//! RP2040-specific HAL for the sign firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `marquee-hal` traits, plus the panel driver:
//!
//! - Flash storage driver (implements `marquee_hal::FlashStorage`)
//! - GPIO wrappers for buttons and panel lines
//! - PWM buzzer (implements `marquee_hal::ToneOutput`)
//! - HUB75 scan-out (implements `marquee_display::DisplayBackend`)

#![no_std]

pub mod buzzer;
pub mod flash;
pub mod gpio;
pub mod hub75;

// Re-export shared traits from marquee-hal for convenience
pub use marquee_hal::{FlashStorage as FlashStorageTrait, StorageKey};
