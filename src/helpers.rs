//! Shared unit conversions.
//!
//! Every metric value in a response is paired with its imperial counterpart
//! using these fixed linear conversions. No rounding is applied, so
//! `celsius_to_fahrenheit(23.0)` is exactly `73.4` within f64 tolerance.

/// Kilometres per hour → miles per hour factor.
pub(crate) const KPH_TO_MPH: f64 = 0.621371;

/// F = C × 9/5 + 32
pub(crate) fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub(crate) fn kph_to_mph(kph: f64) -> f64 {
    kph * KPH_TO_MPH
}

/// Time-of-day part of an ISO local datetime ("2026-03-01T07:12" → "07:12").
///
/// Returns `None` when there is no `T` separator or nothing after it.
pub(crate) fn time_of_day(iso_local: &str) -> Option<&str> {
    iso_local
        .split_once('T')
        .map(|(_, time)| time)
        .filter(|time| !time.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert!((celsius_to_fahrenheit(23.0) - 73.4).abs() < 1e-9);
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn test_kph_to_mph() {
        assert!((kph_to_mph(100.0) - 62.1371).abs() < 1e-9);
        assert_eq!(kph_to_mph(0.0), 0.0);
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(time_of_day("2026-03-01T07:12"), Some("07:12"));
        assert_eq!(time_of_day("2026-03-01"), None);
        assert_eq!(time_of_day("2026-03-01T"), None);
    }
}
