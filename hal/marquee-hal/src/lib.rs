//! Marquee Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the sign logic is
//! written against. Chip-specific crates implement them so the scheduler,
//! screens and tone player can be exercised on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (marquee-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  marquee-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ marquee-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O (buttons, panel lines)
//! - [`tone::ToneOutput`] - Piezo buzzer driven by PWM
//! - [`flash::FlashStorage`] - Persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod tone;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey, RECORD_SLOTS};
pub use gpio::{ButtonPin, InputPin, OutputPin};
pub use tone::{duty_for_volume, ToneOutput};
