//! WMO weather code → description and icon.
//!
//! Both lookups are total: any code without a table entry maps to
//! `"Unknown"` / [`DEFAULT_ICON`].

use crate::models::Condition;

pub const UNKNOWN_DESCRIPTION: &str = "Unknown";
pub const DEFAULT_ICON: &str = "🌤️";

pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear Sky",
        1 => "Mostly Clear",
        2 => "Partly Cloudy",
        3 => "Overcast",
        45 | 48 => "Foggy",
        51 => "Light Drizzle",
        53 => "Moderate Drizzle",
        55 => "Heavy Drizzle",
        61 => "Slight Rain",
        63 => "Moderate Rain",
        65 => "Heavy Rain",
        71 => "Slight Snow",
        73 => "Moderate Snow",
        75 => "Heavy Snow",
        77 => "Snow Grains",
        80 => "Slight Rain Showers",
        81 => "Moderate Rain Showers",
        82 => "Heavy Rain Showers",
        85 => "Slight Snow Showers",
        86 => "Heavy Snow Showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with Slight Hail",
        99 => "Thunderstorm with Heavy Hail",
        _ => UNKNOWN_DESCRIPTION,
    }
}

/// Icons are assigned by code range, so freezing drizzle/rain (56, 57, 66,
/// 67) get the rain icon even though they have no description entry.
pub fn icon(code: i32) -> &'static str {
    match code {
        0 => "☀️",
        1..=3 => "⛅",
        45 | 48 => "🌫️",
        51..=67 => "🌧️",
        71..=77 => "❄️",
        80..=82 => "🌦️",
        85 | 86 => "🌨️",
        95..=99 => "⛈️",
        _ => DEFAULT_ICON,
    }
}

pub fn condition(code: i32) -> Condition {
    Condition {
        text: describe(code).to_string(),
        icon: icon(code).to_string(),
        code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sky_codes() {
        assert_eq!(describe(0), "Clear Sky");
        assert_eq!(describe(1), "Mostly Clear");
        assert_eq!(describe(2), "Partly Cloudy");
        assert_eq!(describe(3), "Overcast");
        assert_eq!(icon(0), "☀️");
        assert_eq!(icon(2), "⛅");
    }

    #[test]
    fn test_precipitation_tiers() {
        assert_eq!(describe(53), "Moderate Drizzle");
        assert_eq!(describe(65), "Heavy Rain");
        assert_eq!(describe(77), "Snow Grains");
        assert_eq!(describe(81), "Moderate Rain Showers");
        assert_eq!(describe(86), "Heavy Snow Showers");
        assert_eq!(describe(96), "Thunderstorm with Slight Hail");
        assert_eq!(icon(75), "❄️");
        assert_eq!(icon(85), "🌨️");
        assert_eq!(icon(99), "⛈️");
    }

    #[test]
    fn test_freezing_rain_has_icon_but_no_description() {
        assert_eq!(describe(66), UNKNOWN_DESCRIPTION);
        assert_eq!(icon(66), "🌧️");
    }

    #[test]
    fn test_mapping_is_total() {
        for code in -1000..=1000 {
            let c = condition(code);
            assert!(!c.text.is_empty());
            assert!(!c.icon.is_empty());
        }
        assert_eq!(describe(i32::MIN), UNKNOWN_DESCRIPTION);
        assert_eq!(icon(i32::MAX), DEFAULT_ICON);
        assert_eq!(icon(-1), DEFAULT_ICON);
        assert_eq!(describe(4), UNKNOWN_DESCRIPTION);
    }
}
