//! Screen identities and the transition table

use super::cues::Cue;

/// Screens the sign can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenId {
    /// Time of day; the home screen
    Clock,
    /// Network address, on button A
    IpAddress,
    /// Fixed image, on button B
    Splash,
    /// Greeting for a detected person
    Greet,
    /// Operator message
    Message,
    /// Current conditions and forecast
    Weather,
    /// UV index
    Uvi,
    /// Air quality index
    Aqi,
    /// Pollen count
    Pollen,
    /// Transit arrivals; no arcs lead here yet
    Trimet,
}

/// Rotation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rotation {
    /// Visit Pollen between UV and the clock
    pub include_pollen: bool,
}

impl ScreenId {
    /// Short lowercase name for logs and `/info`
    pub const fn name(self) -> &'static str {
        match self {
            ScreenId::Clock => "clock",
            ScreenId::IpAddress => "ip_address",
            ScreenId::Splash => "splash",
            ScreenId::Greet => "greet",
            ScreenId::Message => "message",
            ScreenId::Weather => "weather",
            ScreenId::Uvi => "uvi",
            ScreenId::Aqi => "aqi",
            ScreenId::Pollen => "pollen",
            ScreenId::Trimet => "trimet",
        }
    }

    /// Screens entered preemptively that return to the clock on expiry
    pub const fn is_interrupt(self) -> bool {
        matches!(
            self,
            ScreenId::IpAddress | ScreenId::Splash | ScreenId::Greet | ScreenId::Message
        )
    }

    /// Screens in the regular cycle
    pub const fn is_rotation(self) -> bool {
        matches!(
            self,
            ScreenId::Clock | ScreenId::Weather | ScreenId::Aqi | ScreenId::Uvi | ScreenId::Pollen
        )
    }

    /// Process a cue and return the next screen
    ///
    /// `None` means the cue has no arc from this screen: stay, and keep
    /// the current countdown. `Some` always starts a fresh countdown,
    /// even when it names the current screen.
    pub fn transition(self, cue: Cue, rotation: Rotation) -> Option<Self> {
        use Cue::*;
        use ScreenId::*;

        match (self, cue) {
            // Overrides preempt every screen
            (_, IpRequested) => Some(IpAddress),
            (_, SplashRequested) => Some(Splash),
            (_, GreetArrived) => Some(Greet),
            (_, MessageArrived) => Some(Message),

            // Interrupt screens go home when their time is up
            (IpAddress | Splash | Greet | Message, Expired) => Some(Clock),

            // Rotation
            (Clock, Expired) => Some(Weather),
            (Weather, Expired | Unavailable) => Some(Aqi),
            (Aqi, Expired | Unavailable) => Some(Uvi),
            (Uvi, Sundown) => Some(Clock),
            (Uvi, Expired | Unavailable) if rotation.include_pollen => Some(Pollen),
            (Uvi, Expired | Unavailable) => Some(Clock),
            (Pollen, Expired | Unavailable) => Some(Clock),

            // Default: stay on the current screen
            _ => None,
        }
    }
}
