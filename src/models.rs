//! Canonical response shapes.
//!
//! These are independent of the upstream provider's schema. Fields the
//! provider does not supply are filled with fixed placeholder values, so
//! every field is always present in the JSON.

use serde::Serialize;
use utoipa::ToSchema;

/// A place resolved from a free-text query (first geocoding match).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResolvedPlace {
    /// Place name (e.g. "Zurich")
    pub name: String,
    /// First-level administrative region, empty when unknown
    pub region: String,
    /// Country name, empty when unknown
    pub country: String,
    /// Latitude (WGS84)
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude (WGS84)
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// IANA timezone identifier
    #[serde(rename = "tz_id")]
    pub timezone: String,
}

/// Human-readable weather condition derived from a WMO weather code.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub code: i32,
}

/// Instantaneous conditions at a place.
///
/// Wind direction, pressure, precipitation, cloud cover, UV, visibility and
/// dew point are placeholders: the upstream request does not ask for them.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    /// Relative humidity percentage
    pub humidity: f64,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub windspeed_kph: f64,
    pub windspeed_mph: f64,
    pub wind_degree: i32,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub pressure_in: f64,
    pub precip_mm: f64,
    pub precip_in: f64,
    /// Cloud cover percentage
    pub cloud: i32,
    pub is_day: i32,
    pub uv: f64,
    pub visibility_km: f64,
    pub visibility_miles: f64,
    pub gust_kph: f64,
    pub gust_mph: f64,
    pub dewpoint_c: f64,
    pub dewpoint_f: f64,
    /// Not provided; always null
    #[schema(value_type = Option<Object>)]
    pub air_quality: Option<serde_json::Value>,
}

/// Daily aggregates for one forecast date.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    pub avgtemp_c: f64,
    pub avgtemp_f: f64,
    pub maxwind_kph: f64,
    pub maxwind_mph: f64,
    /// Placeholder
    pub avghumidity: f64,
    /// Derived from the precipitation sum, not a provider probability
    pub chance_of_rain: f64,
    /// Placeholder
    pub chance_of_snow: f64,
    pub condition: Condition,
    /// Placeholder
    pub uv: f64,
}

/// Sun and moon times. Moon values are placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Astronomy {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastDay {
    /// Local date, as returned by the provider (YYYY-MM-DD)
    pub date: String,
    pub day: DaySummary,
    pub astro: Astronomy,
}

/// Payload of GET /api/weather/current.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentWeather {
    pub location: ResolvedPlace,
    pub current: CurrentConditions,
    /// When this payload was produced (RFC 3339)
    pub last_updated: String,
    pub last_updated_epoch: i64,
}

/// Payload of GET /api/weather/forecast.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherReport {
    pub location: ResolvedPlace,
    pub current: CurrentConditions,
    /// One entry per day, in provider order
    pub forecast: Vec<ForecastDay>,
}

/// A geocoding candidate as returned by GET /api/weather/search.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LocationSummary {
    /// Synthesized as "lat,lon"
    pub id: String,
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub url: String,
}

impl From<&ResolvedPlace> for LocationSummary {
    fn from(p: &ResolvedPlace) -> Self {
        Self {
            id: format!("{},{}", p.latitude, p.longitude),
            name: p.name.clone(),
            region: p.region.clone(),
            country: p.country.clone(),
            lat: p.latitude,
            lon: p.longitude,
            url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PlaceName {
    pub name: String,
    pub region: String,
    pub country: String,
}

/// Payload of GET /api/weather/astronomy.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AstronomyReport {
    pub location: PlaceName,
    pub astronomy: Astronomy,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zurich() -> ResolvedPlace {
        ResolvedPlace {
            name: "Zurich".to_string(),
            region: "Zurich".to_string(),
            country: "Switzerland".to_string(),
            latitude: 47.36667,
            longitude: 8.55,
            timezone: "Europe/Zurich".to_string(),
        }
    }

    #[test]
    fn test_location_summary_id_is_lat_lon() {
        let summary = LocationSummary::from(&zurich());
        assert_eq!(summary.id, "47.36667,8.55");
        assert_eq!(summary.url, "");
        assert_eq!(summary.lat, 47.36667);
    }

    #[test]
    fn test_resolved_place_wire_keys() {
        let json = serde_json::to_value(zurich()).unwrap();
        assert_eq!(json["lat"], 47.36667);
        assert_eq!(json["lon"], 8.55);
        assert_eq!(json["tz_id"], "Europe/Zurich");
        assert!(json.get("latitude").is_none());
    }
}
