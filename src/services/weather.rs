//! Weather normalizer.
//!
//! Resolves a free-text location to a place (first geocoding match), makes at
//! most one weather-data call, and maps the Open-Meteo payload into the
//! canonical shapes in `crate::models`.
//!
//! Error policy: upstream failures are logged and re-wrapped with a generic
//! message per operation. Errors that already carry a classification (the
//! resolver's `NotFound`, input validation) pass through unchanged.

use chrono::Utc;

use crate::errors::WeatherError;
use crate::helpers::{celsius_to_fahrenheit, kph_to_mph, time_of_day};
use crate::models::{
    Astronomy, AstronomyReport, CurrentConditions, CurrentWeather, DaySummary, ForecastDay,
    LocationSummary, PlaceName, ResolvedPlace, WeatherReport,
};
use crate::services::conditions;
use crate::services::open_meteo::{CurrentBlock, DailyBlock, GeoPlace, OpenMeteoClient};

/// Smallest day count the upstream accepts.
pub const MIN_FORECAST_DAYS: u8 = 1;
/// Largest day count the upstream accepts. The HTTP layer clamps further to 10.
pub const MAX_FORECAST_DAYS: u8 = 16;

// --- Placeholders for metrics the upstream request does not supply ---

const PLACEHOLDER_WIND_DEGREE: i32 = 0;
const PLACEHOLDER_WIND_DIR: &str = "N";
const PLACEHOLDER_PRESSURE_MB: f64 = 1013.0;
const PLACEHOLDER_PRESSURE_IN: f64 = 29.92;
const PLACEHOLDER_CLOUD_PCT: i32 = 50;
const PLACEHOLDER_UV: f64 = 5.0;
const PLACEHOLDER_VISIBILITY_KM: f64 = 10.0;
const PLACEHOLDER_VISIBILITY_MILES: f64 = 6.2;
const PLACEHOLDER_DEWPOINT_C: f64 = 10.0;
const PLACEHOLDER_AVG_HUMIDITY: f64 = 60.0;

/// Gusts are estimated from the sustained wind speed.
const GUST_FACTOR: f64 = 1.2;

// --- Per-day defaults when the upstream array entry is missing or null ---

const DEFAULT_MAX_TEMP_C: f64 = 20.0;
const DEFAULT_MIN_TEMP_C: f64 = 15.0;
const DEFAULT_MAX_WIND_KPH: f64 = 10.0;
const DEFAULT_SUNRISE: &str = "06:00";
const DEFAULT_SUNSET: &str = "18:00";

/// Precipitation sum (mm) → "chance of rain" percentage multiplier.
const RAIN_CHANCE_PER_MM: f64 = 10.0;

/// Stand-in for the forecast's current block when upstream omits it or sends
/// it incomplete.
const FALLBACK_CURRENT: CurrentBlock = CurrentBlock {
    temperature_2m: 20.0,
    relative_humidity_2m: 65.0,
    apparent_temperature: 20.0,
    weather_code: 2,
    wind_speed_10m: 10.0,
};

/// Fixed astronomy record. Placeholder: not computed from place or date.
fn placeholder_astronomy() -> Astronomy {
    Astronomy {
        sunrise: "06:30".to_string(),
        sunset: "18:45".to_string(),
        moonrise: "21:30".to_string(),
        moonset: "09:15".to_string(),
        moon_phase: "Waxing Crescent".to_string(),
        moon_illumination: 25,
    }
}

/// Reject missing or whitespace-only input.
fn require<'a>(value: &'a str, message: &str) -> Result<&'a str, WeatherError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::InvalidArgument(message.to_string()));
    }
    Ok(trimmed)
}

fn to_resolved_place(place: &GeoPlace, timezone: Option<&str>) -> ResolvedPlace {
    ResolvedPlace {
        name: place.name.clone(),
        region: place.admin1.clone().unwrap_or_default(),
        country: place.country.clone().unwrap_or_default(),
        latitude: place.latitude,
        longitude: place.longitude,
        timezone: timezone
            .or(place.timezone.as_deref())
            .unwrap_or("UTC")
            .to_string(),
    }
}

/// Resolve a free-text location into geocoding candidates, in upstream order.
///
/// Fails with `NotFound` for blank input or zero matches, and with
/// `Upstream` when the geocoding call fails.
pub async fn resolve_location(
    client: &OpenMeteoClient,
    location: &str,
) -> Result<Vec<GeoPlace>, WeatherError> {
    let query = location.trim();
    if query.is_empty() {
        return Err(WeatherError::NotFound("Location not found".to_string()));
    }

    let places = client
        .search_places(query)
        .await
        .map_err(|e| e.into_weather_error("Failed to geocode location"))?;

    if places.is_empty() {
        tracing::debug!("No geocoding match for '{}'", query);
        return Err(WeatherError::NotFound("Location not found".to_string()));
    }

    Ok(places)
}

/// Resolve a location and keep only the authoritative first match.
async fn resolve_first(client: &OpenMeteoClient, location: &str) -> Result<GeoPlace, WeatherError> {
    resolve_location(client, location)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::NotFound("Location not found".to_string()))
}

/// Map instantaneous upstream values into `CurrentConditions`, filling the
/// unsupplied metrics with placeholders.
pub fn build_current_conditions(current: &CurrentBlock) -> CurrentConditions {
    let wind_kph = current.wind_speed_10m;
    let gust_kph = wind_kph * GUST_FACTOR;

    CurrentConditions {
        temp_c: current.temperature_2m,
        temp_f: celsius_to_fahrenheit(current.temperature_2m),
        condition: conditions::condition(current.weather_code),
        humidity: current.relative_humidity_2m,
        feelslike_c: current.apparent_temperature,
        feelslike_f: celsius_to_fahrenheit(current.apparent_temperature),
        windspeed_kph: wind_kph,
        windspeed_mph: kph_to_mph(wind_kph),
        wind_degree: PLACEHOLDER_WIND_DEGREE,
        wind_dir: PLACEHOLDER_WIND_DIR.to_string(),
        pressure_mb: PLACEHOLDER_PRESSURE_MB,
        pressure_in: PLACEHOLDER_PRESSURE_IN,
        precip_mm: 0.0,
        precip_in: 0.0,
        cloud: PLACEHOLDER_CLOUD_PCT,
        is_day: 1,
        uv: PLACEHOLDER_UV,
        visibility_km: PLACEHOLDER_VISIBILITY_KM,
        visibility_miles: PLACEHOLDER_VISIBILITY_MILES,
        gust_kph,
        gust_mph: kph_to_mph(gust_kph),
        dewpoint_c: PLACEHOLDER_DEWPOINT_C,
        dewpoint_f: celsius_to_fahrenheit(PLACEHOLDER_DEWPOINT_C),
        air_quality: None,
    }
}

/// `min(100, precipitation_sum × 10)`, floored at 0. An approximation, not a
/// provider probability.
pub fn chance_of_rain(precipitation_sum_mm: f64) -> f64 {
    if !precipitation_sum_mm.is_finite() {
        return if precipitation_sum_mm == f64::INFINITY { 100.0 } else { 0.0 };
    }
    (precipitation_sum_mm * RAIN_CHANCE_PER_MM).clamp(0.0, 100.0)
}

fn at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

fn time_at(values: &[Option<String>], index: usize, default: &str) -> String {
    values
        .get(index)
        .and_then(|v| v.as_deref())
        .and_then(time_of_day)
        .unwrap_or(default)
        .to_string()
}

/// Build one `ForecastDay` per upstream date, in upstream order.
///
/// Missing or null per-day values fall back to fixed defaults, so a day with
/// partial data still yields a complete entry. At most `days` entries are
/// returned.
pub fn build_forecast_days(daily: &DailyBlock, days: usize) -> Vec<ForecastDay> {
    let moon = placeholder_astronomy();

    daily
        .time
        .iter()
        .take(days)
        .enumerate()
        .map(|(i, date)| {
            let max_c = at(&daily.temperature_2m_max, i).unwrap_or(DEFAULT_MAX_TEMP_C);
            let min_c = at(&daily.temperature_2m_min, i).unwrap_or(DEFAULT_MIN_TEMP_C);
            let avg_c = (max_c + min_c) / 2.0;
            let wind_kph = at(&daily.wind_speed_10m_max, i).unwrap_or(DEFAULT_MAX_WIND_KPH);
            let precip_mm = at(&daily.precipitation_sum, i).unwrap_or(0.0);
            let code = at(&daily.weather_code, i).unwrap_or(0);

            ForecastDay {
                date: date.clone(),
                day: DaySummary {
                    maxtemp_c: max_c,
                    maxtemp_f: celsius_to_fahrenheit(max_c),
                    mintemp_c: min_c,
                    mintemp_f: celsius_to_fahrenheit(min_c),
                    avgtemp_c: avg_c,
                    avgtemp_f: celsius_to_fahrenheit(avg_c),
                    maxwind_kph: wind_kph,
                    maxwind_mph: kph_to_mph(wind_kph),
                    avghumidity: PLACEHOLDER_AVG_HUMIDITY,
                    chance_of_rain: chance_of_rain(precip_mm),
                    chance_of_snow: 0.0,
                    condition: conditions::condition(code),
                    uv: PLACEHOLDER_UV,
                },
                astro: Astronomy {
                    sunrise: time_at(&daily.sunrise, i, DEFAULT_SUNRISE),
                    sunset: time_at(&daily.sunset, i, DEFAULT_SUNSET),
                    ..moon.clone()
                },
            }
        })
        .collect()
}

/// Current conditions for the first place matching `location`.
pub async fn get_current_weather(
    client: &OpenMeteoClient,
    location: &str,
) -> Result<CurrentWeather, WeatherError> {
    let location = require(location, "Location is required")?;
    let place = resolve_first(client, location).await?;

    let response = client
        .fetch_current(place.latitude, place.longitude)
        .await
        .map_err(|e| e.into_weather_error("Failed to fetch current weather"))?;

    let now = Utc::now();
    tracing::debug!(
        "Current weather for {} ({}, {})",
        place.name,
        place.latitude,
        place.longitude
    );

    Ok(CurrentWeather {
        location: to_resolved_place(&place, response.timezone.as_deref()),
        current: build_current_conditions(&response.current),
        last_updated: now.to_rfc3339(),
        last_updated_epoch: now.timestamp(),
    })
}

/// Current conditions plus `days` daily entries for the first place
/// matching `location`. `days` must be within 1..=16.
pub async fn get_forecast(
    client: &OpenMeteoClient,
    location: &str,
    days: u32,
) -> Result<WeatherReport, WeatherError> {
    let location = require(location, "Location is required")?;
    let days = u8::try_from(days)
        .ok()
        .filter(|d| (MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(d))
        .ok_or_else(|| {
            WeatherError::InvalidArgument(format!(
                "Forecast days must be between {} and {}",
                MIN_FORECAST_DAYS, MAX_FORECAST_DAYS
            ))
        })?;

    let place = resolve_first(client, location).await?;

    let response = client
        .fetch_forecast(place.latitude, place.longitude, days)
        .await
        .map_err(|e| e.into_weather_error("Failed to fetch forecast"))?;

    let daily = response.daily.unwrap_or_default();
    let forecast = build_forecast_days(&daily, usize::from(days));
    if forecast.len() < usize::from(days) {
        tracing::warn!(
            "Upstream returned {} forecast days for {}, requested {}",
            forecast.len(),
            place.name,
            days
        );
    }

    let current = match &response.current {
        Some(block) => build_current_conditions(block),
        None => {
            tracing::warn!("No usable current block for {}, using fallback values", place.name);
            build_current_conditions(&FALLBACK_CURRENT)
        }
    };

    Ok(WeatherReport {
        location: to_resolved_place(&place, response.timezone.as_deref()),
        current,
        forecast,
    })
}

/// All geocoding candidates for `query`, in upstream order.
pub async fn search_locations(
    client: &OpenMeteoClient,
    query: &str,
) -> Result<Vec<LocationSummary>, WeatherError> {
    let query = require(query, "Search query is required")?;
    let places = resolve_location(client, query).await?;

    Ok(places
        .iter()
        .map(|p| LocationSummary::from(&to_resolved_place(p, None)))
        .collect())
}

/// Astronomy data for the first place matching `location`.
///
/// The date is required but not otherwise used: the record is a fixed
/// placeholder until a real astronomy source is wired in.
pub async fn get_astronomy(
    client: &OpenMeteoClient,
    location: &str,
    date: &str,
) -> Result<AstronomyReport, WeatherError> {
    let location = require(location, "Location is required")?;
    require(date, "Date is required (YYYY-MM-DD)")?;

    let place = resolve_first(client, location).await?;

    Ok(AstronomyReport {
        location: PlaceName {
            name: place.name,
            region: place.admin1.unwrap_or_default(),
            country: place.country.unwrap_or_default(),
        },
        astronomy: placeholder_astronomy(),
    })
}
