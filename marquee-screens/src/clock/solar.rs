//! Sun position rules for the clock

use marquee_core::data::Solar;
use marquee_display::Color;

const HOUR: u64 = 60 * 60;

/// Clock colour when no solar data is known
pub const DEFAULT_COLOR: Color = Color::GREEN;

/// Colour of the clock at `now`
///
/// Orange in the hour before sunset, blue in the hour before sunrise,
/// green in daylight and red at night.
pub fn clock_color(solar: Option<Solar>, now: u64) -> Color {
    let Some(solar) = solar else {
        return DEFAULT_COLOR;
    };

    if solar.sunset.saturating_sub(HOUR) <= now && now <= solar.sunset {
        return Color::ORANGE;
    }
    if solar.sunrise.saturating_sub(HOUR) <= now && now <= solar.sunrise {
        return Color::BLUE;
    }
    if solar.sunset < solar.sunrise && now <= solar.sunset {
        return Color::GREEN;
    }
    Color::RED
}

/// Whether UV is no longer worth showing
///
/// True from half an hour before sunset onwards.
pub fn is_sundown(solar: Option<Solar>, now: u64) -> bool {
    match solar {
        Some(solar) => now >= solar.sunset.saturating_sub(HOUR / 2),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Today's sunset, then tomorrow's sunrise
    const DAY: Solar = Solar {
        sunrise: 100_000,
        sunset: 50_000,
    };

    #[test]
    fn test_no_solar() {
        assert_eq!(clock_color(None, 0), Color::GREEN);
        assert!(!is_sundown(None, 0));
    }

    #[test]
    fn test_colors_through_the_day() {
        assert_eq!(clock_color(Some(DAY), 40_000), Color::GREEN);
        assert_eq!(clock_color(Some(DAY), 50_000 - HOUR), Color::ORANGE);
        assert_eq!(clock_color(Some(DAY), 50_000), Color::ORANGE);
        assert_eq!(clock_color(Some(DAY), 60_000), Color::RED);
        assert_eq!(clock_color(Some(DAY), 100_000 - HOUR), Color::BLUE);
        assert_eq!(clock_color(Some(DAY), 100_001), Color::RED);
    }

    #[test]
    fn test_sundown_window() {
        assert!(!is_sundown(Some(DAY), 40_000));
        assert!(!is_sundown(Some(DAY), 50_000 - HOUR / 2 - 1));
        assert!(is_sundown(Some(DAY), 50_000 - HOUR / 2));
        assert!(is_sundown(Some(DAY), 50_000));
        assert!(is_sundown(Some(DAY), 90_000));
    }
}
