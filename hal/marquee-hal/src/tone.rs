//! Tone output abstraction
//!
//! A piezo buzzer driven by a PWM slice: the frequency sets the PWM period
//! and the volume sets the duty cycle.

/// Full-volume duty cycle, as a fraction of the 16-bit range
///
/// A square wave at 50% duty is the loudest a piezo gets.
pub const MAX_DUTY: u16 = 1 << 15;

/// Compute the PWM duty for a volume given in percent (0-100)
///
/// Volumes above 100 are clamped.
pub fn duty_for_volume(volume_percent: u8) -> u16 {
    let volume = volume_percent.min(100) as u32;
    (MAX_DUTY as u32 * volume / 100) as u16
}

/// Tone generator
pub trait ToneOutput {
    /// Start sounding `frequency_hz` at `duty` (see [`duty_for_volume`])
    fn set_tone(&mut self, frequency_hz: u32, duty: u16);

    /// Stop any tone
    fn silence(&mut self);
}
