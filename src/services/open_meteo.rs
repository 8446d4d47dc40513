//! Open-Meteo geocoding and forecast client.
//!
//! See: https://open-meteo.com/en/docs and
//! https://open-meteo.com/en/docs/geocoding-api
//!
//! The client only performs the HTTP calls and deserializes the payloads.
//! Mapping into the canonical response shapes lives in `services::weather`.

use serde::Deserialize;
use std::time::Duration;

use crate::errors::{UpstreamFailure, WeatherError};

/// Upstream cap on geocoding candidates.
pub const GEOCODING_RESULT_COUNT: u8 = 10;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = concat!(
    "weather_code,temperature_2m_max,temperature_2m_min,",
    "sunrise,sunset,precipitation_sum,wind_speed_10m_max"
);

/// Client for the Open-Meteo APIs.
///
/// Cheap to clone: `reqwest::Client` is reference counted internally.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    geocoding_url: String,
    weather_url: String,
}

// --- Open-Meteo JSON response types ---

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    /// Absent (not empty) when nothing matches.
    results: Option<Vec<GeoPlace>>,
}

/// One geocoding candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoPlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    /// First-level administrative area (state, canton, ...)
    pub admin1: Option<String>,
    pub timezone: Option<String>,
}

/// Response of a `current=` request.
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub timezone: Option<String>,
    pub current: CurrentBlock,
}

/// Instantaneous values. All fields are required; a payload missing any of
/// them is rejected as malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentBlock {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub weather_code: i32,
    pub wind_speed_10m: f64,
}

/// Response of a combined `current=` + `daily=` request.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub timezone: Option<String>,
    /// `None` when the block is absent or any required value is missing or
    /// null. The daily data alone is enough for a forecast.
    #[serde(default, deserialize_with = "lenient_current")]
    pub current: Option<CurrentBlock>,
    pub daily: Option<DailyBlock>,
}

fn lenient_current<'de, D>(deserializer: D) -> Result<Option<CurrentBlock>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value(value) {
        Ok(block) => Some(block),
        Err(e) => {
            tracing::warn!("Ignoring malformed current block in forecast: {}", e);
            None
        }
    }))
}

/// Per-day arrays keyed in parallel by the index into `time`.
///
/// Every array may be missing, shorter than `time`, or contain nulls.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<i32>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub sunrise: Vec<Option<String>>,
    pub sunset: Vec<Option<String>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub wind_speed_10m_max: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    pub fn new(
        geocoding_url: &str,
        weather_url: &str,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| WeatherError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            geocoding_url: geocoding_url.to_string(),
            weather_url: weather_url.to_string(),
        })
    }

    /// Look up candidates for a free-text place name, in upstream order.
    ///
    /// Returns an empty list when nothing matches; deciding whether that is
    /// an error is up to the caller.
    pub async fn search_places(&self, name: &str) -> Result<Vec<GeoPlace>, UpstreamFailure> {
        let count = GEOCODING_RESULT_COUNT.to_string();
        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[
                ("name", name),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamFailure::Status(response.status()));
        }

        let body: GeocodingResponse = response.json().await?;
        Ok(body.results.unwrap_or_default())
    }

    /// Fetch instantaneous conditions at a coordinate.
    pub async fn fetch_current(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentResponse, UpstreamFailure> {
        let response = self
            .client
            .get(&self.weather_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", "1".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamFailure::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    /// Fetch current conditions and `days` daily aggregates in one call.
    pub async fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        days: u8,
    ) -> Result<ForecastResponse, UpstreamFailure> {
        let response = self
            .client
            .get(&self.weather_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", days.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamFailure::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}
