pub mod health;
pub mod weather;

use axum::http::{header, HeaderName, HeaderValue, StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::time::Duration;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::ToSchema;

use crate::services::open_meteo::OpenMeteoClient;

/// Shared application state for weather endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) client: OpenMeteoClient,
}

/// Success envelope wrapping every weather payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true`
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: &str, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            data,
        })
    }
}

/// Body returned for unknown routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteNotFound {
    pub success: bool,
    pub message: String,
    pub path: String,
}

async fn not_found(uri: Uri) -> (StatusCode, Json<RouteNotFound>) {
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFound {
            success: false,
            message: "Route not found".to_string(),
            path: uri.path().to_string(),
        }),
    )
}

/// Hardening headers set on every API response, overriding handler values.
fn security_headers() -> [(HeaderName, HeaderValue); 5] {
    [
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
        (header::REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
        (header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off")),
        (
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("same-origin"),
        ),
    ]
}

/// All API routes plus the 404 fallback, with security headers and a
/// per-request timeout (408 once exceeded). Docs, CORS and tracing layers are
/// added by `main`.
pub(crate) fn router(state: AppState, request_timeout: Duration) -> Router {
    let weather_routes = Router::new()
        .route("/api/weather/current", get(weather::get_current_weather))
        .route("/api/weather/forecast", get(weather::get_forecast))
        .route("/api/weather/search", get(weather::search_locations))
        .route("/api/weather/astronomy", get(weather::get_astronomy))
        .with_state(state);

    let mut app = Router::new()
        .route("/api/health", get(health::health_check))
        .merge(weather_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::new(request_timeout));

    for (name, value) in security_headers() {
        app = app.layer(SetResponseHeaderLayer::overriding(name, value));
    }
    app
}
