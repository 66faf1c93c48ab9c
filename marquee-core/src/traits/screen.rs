//! Screen traits
//!
//! A screen reads the data store and describes what the panel should show
//! by rebuilding the shared [`Scene`]. Screens never decide when they are
//! shown; that is the scheduler's job.

use core::fmt::Write;

use heapless::String;
use marquee_display::{Color, DisplayError, Scene};

use crate::data::DataStore;

/// Result of asking a screen to render its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShowOutcome {
    /// The scene now shows this screen
    Shown,
    /// Nothing to show: no data, not updated, or a zero reading
    NoData,
    /// Data is present but lacks a required field
    Malformed,
}

impl ShowOutcome {
    /// Whether the screen rendered
    pub fn is_shown(self) -> bool {
        self == ShowOutcome::Shown
    }
}

/// Errors a screen can raise
///
/// These are genuine faults, not "nothing to show". The scheduler
/// propagates them to the run loop supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenError {
    /// Scene could not hold the content
    Display(DisplayError),
    /// Text formatting overflowed its buffer
    Format,
}

impl From<DisplayError> for ScreenError {
    fn from(e: DisplayError) -> Self {
        ScreenError::Display(e)
    }
}

impl From<core::fmt::Error> for ScreenError {
    fn from(_: core::fmt::Error) -> Self {
        ScreenError::Format
    }
}

/// Local wall-clock time and the colour the clock is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockReading {
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
    pub color: Color,
}

impl ClockReading {
    /// Split local seconds since the epoch into a reading
    pub fn from_local_seconds(local: i64, color: Color) -> Self {
        let of_day = local.rem_euclid(86_400);
        Self {
            hour: (of_day / 3600) as u8,
            minute: (of_day % 3600 / 60) as u8,
            second: (of_day % 60) as u8,
            color,
        }
    }

    /// `H:MM`, with the colon shown on odd seconds only
    pub fn text(&self) -> String<8> {
        let colon = if self.second % 2 == 1 { ':' } else { ' ' };
        let mut text = String::new();
        // "23:59" always fits
        let _ = write!(text, "{}{}{:02}", self.hour, colon, self.minute);
        text
    }
}

/// Everything a screen may touch during one tick
pub struct ScreenContext<'a> {
    pub data: &'a mut DataStore,
    pub scene: &'a mut Scene,
    /// Platform time in seconds
    pub now: u64,
    /// Current clock reading, filled in by the scheduler
    pub clock: Option<ClockReading>,
}

impl<'a> ScreenContext<'a> {
    pub fn new(data: &'a mut DataStore, scene: &'a mut Scene, now: u64) -> Self {
        Self {
            data,
            scene,
            now,
            clock: None,
        }
    }
}

/// A displayable screen
pub trait Screen {
    /// Render the screen's current data into the scene
    ///
    /// Returns [`ShowOutcome::NoData`] or [`ShowOutcome::Malformed`]
    /// instead of an error when there is simply nothing to show.
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError>;

    /// Incremental work while the screen stays current (scrolling,
    /// redrawing a ticking clock)
    fn update(&mut self, _ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        Ok(())
    }
}

/// The home screen, which also knows the local time and the sun
pub trait ClockScreen: Screen {
    /// Local time and clock colour at `ctx.now`
    fn reading(&mut self, ctx: &mut ScreenContext<'_>) -> ClockReading;

    /// Whether the sun is down, or about to be
    ///
    /// False when no solar data is available.
    fn is_sundown(&mut self, ctx: &mut ScreenContext<'_>) -> bool;

    /// Timezone offset currently applied, in seconds
    fn timezone_offset(&self) -> i64;
}

/// The screens the scheduler drives, one per screen slot
pub struct ScreenTable<'a> {
    pub clock: &'a mut dyn ClockScreen,
    pub ip_address: &'a mut dyn Screen,
    pub splash: &'a mut dyn Screen,
    pub greet: &'a mut dyn Screen,
    pub message: &'a mut dyn Screen,
    pub weather: &'a mut dyn Screen,
    pub aqi: &'a mut dyn Screen,
    pub uvi: &'a mut dyn Screen,
    pub pollen: &'a mut dyn Screen,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_from_local_seconds() {
        // 2023-11-14 22:13:20 UTC
        let reading = ClockReading::from_local_seconds(1_700_000_000, Color::GREEN);
        assert_eq!((reading.hour, reading.minute, reading.second), (22, 13, 20));
    }

    #[test]
    fn test_reading_before_epoch_wraps_into_day() {
        let reading = ClockReading::from_local_seconds(-60, Color::GREEN);
        assert_eq!((reading.hour, reading.minute, reading.second), (23, 59, 0));
    }

    #[test]
    fn test_colon_blinks() {
        let mut reading = ClockReading::from_local_seconds(9 * 3600 + 5 * 60 + 1, Color::RED);
        assert_eq!(reading.text().as_str(), "9:05");
        reading.second = 2;
        assert_eq!(reading.text().as_str(), "9 05");
    }

    #[test]
    fn test_is_shown() {
        assert!(ShowOutcome::Shown.is_shown());
        assert!(!ShowOutcome::NoData.is_shown());
        assert!(!ShowOutcome::Malformed.is_shown());
    }
}
