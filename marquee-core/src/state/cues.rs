//! Cues that move the sign between screens

/// Something the scheduler noticed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cue {
    /// Button A is held: show the network address
    IpRequested,
    /// Button B is held: show the splash image
    SplashRequested,
    /// A new greeting rendered successfully
    GreetArrived,
    /// A new operator message rendered successfully
    MessageArrived,
    /// The current screen's countdown ran out
    Expired,
    /// The current screen's data is stale, missing or malformed
    Unavailable,
    /// The sun is down, UV is not worth showing
    Sundown,
}
