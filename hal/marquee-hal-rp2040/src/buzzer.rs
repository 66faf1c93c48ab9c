//! PWM piezo buzzer
//!
//! Square wave on one PWM channel. The period sets the pitch and the
//! compare value sets the volume.

use embassy_rp::pwm::{Config, Pwm};
use fixed::types::extra::U4;
use fixed::FixedU16;

/// RP2040 default system clock
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// Lowest frequency reachable with the integer divider
pub const MIN_FREQ_HZ: u32 = SYS_CLK_HZ / (255 * 65_536) + 1;

/// Divider and wrap value for a tone frequency
///
/// Picks the smallest integer divider that keeps `top` within 16 bits,
/// for the finest duty resolution.
pub fn pwm_timing(frequency_hz: u32) -> (u8, u16) {
    let frequency_hz = frequency_hz.max(MIN_FREQ_HZ);
    let divider = SYS_CLK_HZ.div_ceil(frequency_hz.saturating_mul(65_536)).clamp(1, 255);
    let top = (SYS_CLK_HZ / (divider * frequency_hz)).saturating_sub(1);
    (divider as u8, top.min(u16::MAX as u32) as u16)
}

/// Buzzer on a PWM slice, output A
pub struct PwmBuzzer<'d> {
    pwm: Pwm<'d>,
    config: Config,
}

impl<'d> PwmBuzzer<'d> {
    /// Wrap a PWM slice already bound to the buzzer pin
    pub fn new(mut pwm: Pwm<'d>) -> Self {
        let mut config = Config::default();
        config.compare_a = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }
}

impl marquee_hal::ToneOutput for PwmBuzzer<'_> {
    fn set_tone(&mut self, frequency_hz: u32, duty: u16) {
        if frequency_hz == 0 || duty == 0 {
            self.silence();
            return;
        }
        let (divider, top) = pwm_timing(frequency_hz);
        self.config.divider = FixedU16::<U4>::from_num(divider);
        self.config.top = top;
        // duty is a fraction of 2^16
        self.config.compare_a = ((top as u32 + 1) * duty as u32 >> 16) as u16;
        self.config.enable = true;
        self.pwm.set_config(&self.config);
    }

    fn silence(&mut self) {
        self.config.compare_a = 0;
        self.pwm.set_config(&self.config);
    }
}
