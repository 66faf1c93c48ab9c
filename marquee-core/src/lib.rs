//! Board-agnostic core logic for the sign firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware:
//!
//! - Data store with dirty flags and age tracking
//! - Screen state machine and the rotation scheduler
//! - Screen capability traits
//! - Button press/long-press tracking
//! - Failure supervision for the outer run loop
//! - Configuration types and parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod data;
pub mod input;
pub mod scheduler;
pub mod state;
pub mod supervisor;
pub mod traits;
