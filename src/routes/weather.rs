//! Weather HTTP endpoints.
//!
//! - GET /api/weather/current?location=
//! - GET /api/weather/forecast?location=&days=
//! - GET /api/weather/search?q=
//! - GET /api/weather/astronomy?location=&date=
//!
//! Every success is wrapped in `{ success, message, data }`; failures use
//! `ErrorResponse` via `WeatherError`'s `IntoResponse`.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use super::{ApiResponse, AppState};
use crate::errors::{ErrorResponse, WeatherError};
use crate::models::{AstronomyReport, CurrentWeather, LocationSummary, WeatherReport};
use crate::services::weather as normalizer;

/// Day count used when `days` is absent, zero or not a number.
const DEFAULT_FORECAST_DAYS: i64 = 5;
/// Largest day count exposed over HTTP.
const MAX_HTTP_FORECAST_DAYS: i64 = 10;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, IntoParams)]
pub struct LocationQuery {
    /// Free-text place name (e.g. "Zurich")
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ForecastQuery {
    /// Free-text place name
    pub location: Option<String>,
    /// Number of days (default 5, clamped to 1..=10)
    pub days: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Free-text search term
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AstronomyQuery {
    /// Free-text place name
    pub location: Option<String>,
    /// Date in YYYY-MM-DD format
    pub date: Option<String>,
}

fn required(value: Option<String>, message: &str) -> Result<String, WeatherError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| WeatherError::InvalidArgument(message.to_string()))
}

/// Integer value of the longest `[+-]digits` prefix after leading whitespace,
/// so "3abc" is 3 and "2.5" is 2. Out-of-range digit runs saturate.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digit_count = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }
    let prefix = &s[..sign_len + digit_count];
    Some(prefix.parse::<i64>().unwrap_or(if prefix.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Parse the `days` parameter leniently: anything without a leading integer,
/// or zero, falls back to the default; everything else is clamped into 1..=10.
pub(crate) fn parse_days(raw: Option<&str>) -> u32 {
    let days = raw
        .and_then(leading_integer)
        .filter(|&d| d != 0)
        .unwrap_or(DEFAULT_FORECAST_DAYS)
        .clamp(1, MAX_HTTP_FORECAST_DAYS);
    // Clamped into 1..=10 above, so the cast is lossless.
    days as u32
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Get current weather for a location.
#[utoipa::path(
    get,
    path = "/api/weather/current",
    tag = "Weather",
    params(LocationQuery),
    responses(
        (status = 200, description = "Current conditions at the first matching place", body = ApiResponse<CurrentWeather>),
        (status = 400, description = "Missing location or location not found", body = ErrorResponse),
        (status = 503, description = "Upstream weather service unavailable", body = ErrorResponse),
    )
)]
pub async fn get_current_weather(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<ApiResponse<CurrentWeather>>, WeatherError> {
    let location = required(params.location, "Location query parameter is required")?;
    let data = normalizer::get_current_weather(&state.client, &location).await?;
    Ok(ApiResponse::ok("Current weather fetched successfully", data))
}

/// Get a daily forecast for a location.
#[utoipa::path(
    get,
    path = "/api/weather/forecast",
    tag = "Weather",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Current conditions and daily forecast", body = ApiResponse<WeatherReport>),
        (status = 400, description = "Missing location or location not found", body = ErrorResponse),
        (status = 503, description = "Upstream weather service unavailable", body = ErrorResponse),
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ApiResponse<WeatherReport>>, WeatherError> {
    let location = required(params.location, "Location query parameter is required")?;
    let days = parse_days(params.days.as_deref());
    let data = normalizer::get_forecast(&state.client, &location, days).await?;
    Ok(ApiResponse::ok("Forecast fetched successfully", data))
}

/// Search for places matching a free-text query.
#[utoipa::path(
    get,
    path = "/api/weather/search",
    tag = "Weather",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching places, in provider order (at most 10)", body = ApiResponse<Vec<LocationSummary>>),
        (status = 400, description = "Missing query or no matches", body = ErrorResponse),
        (status = 503, description = "Upstream geocoding service unavailable", body = ErrorResponse),
    )
)]
pub async fn search_locations(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<LocationSummary>>>, WeatherError> {
    let query = required(params.q, "Search query parameter is required")?;
    let data = normalizer::search_locations(&state.client, &query).await?;
    Ok(ApiResponse::ok("Search completed successfully", data))
}

/// Get astronomy data for a location on a date.
///
/// The astronomy record is currently a fixed placeholder; the date is
/// required but does not change the result.
#[utoipa::path(
    get,
    path = "/api/weather/astronomy",
    tag = "Weather",
    params(AstronomyQuery),
    responses(
        (status = 200, description = "Astronomy data (placeholder values)", body = ApiResponse<AstronomyReport>),
        (status = 400, description = "Missing location or date, or location not found", body = ErrorResponse),
        (status = 503, description = "Upstream geocoding service unavailable", body = ErrorResponse),
    )
)]
pub async fn get_astronomy(
    State(state): State<AppState>,
    Query(params): Query<AstronomyQuery>,
) -> Result<Json<ApiResponse<AstronomyReport>>, WeatherError> {
    let location = required(params.location, "Location query parameter is required")?;
    let date = required(params.date, "Date query parameter is required (YYYY-MM-DD)")?;
    let data = normalizer::get_astronomy(&state.client, &location, &date).await?;
    Ok(ApiResponse::ok("Astronomy data fetched successfully", data))
}
