// Weather Lookup API v0.1
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod models;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;
use services::open_meteo::OpenMeteoClient;

/// Weather Lookup API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Lookup API",
        version = "0.1.0",
        description = "Resolves free-text locations with Open-Meteo geocoding and returns \
            current conditions, daily forecasts and astronomy data in a stable shape \
            with both metric and imperial units. Metrics the provider does not supply \
            are filled with fixed placeholder values.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Weather", description = "Current weather, forecasts, place search and astronomy"),
    ),
    paths(
        routes::health::health_check,
        routes::weather::get_current_weather,
        routes::weather::get_forecast,
        routes::weather::search_locations,
        routes::weather::get_astronomy,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::RouteNotFound,
            models::ResolvedPlace,
            models::Condition,
            models::CurrentConditions,
            models::DaySummary,
            models::Astronomy,
            models::ForecastDay,
            models::CurrentWeather,
            models::WeatherReport,
            models::LocationSummary,
            models::PlaceName,
            models::AstronomyReport,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

/// CORS for the configured frontend origin (`*` allows any origin).
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origin == "*" {
        return layer.allow_origin(Any);
    }

    match origin.parse::<HeaderValue>() {
        // Credentials are only allowed with an explicit origin.
        Ok(value) => layer.allow_origin(value).allow_credentials(true),
        Err(e) => {
            tracing::warn!("Invalid CORS_ORIGIN '{}' ({}), allowing any origin", origin, e);
            layer.allow_origin(Any)
        }
    }
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT received: closing HTTP server"),
        _ = terminate => tracing::info!("SIGTERM received: closing HTTP server"),
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing. LOG_FORMAT=json switches to structured output.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_lookup_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    let config = AppConfig::from_env();

    let client = OpenMeteoClient::new(
        &config.geocoding_url,
        &config.weather_url,
        Duration::from_secs(config.upstream_timeout_secs),
        &config.user_agent,
    )
    .expect("Failed to build Open-Meteo client");

    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let app = routes::router(AppState { client }, request_timeout)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origin));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Upstream: geocoding={} weather={} (timeout {}s, request timeout {}s)",
        config.geocoding_url,
        config.weather_url,
        config.upstream_timeout_secs,
        config.request_timeout_secs
    );
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server terminated unexpectedly");

    tracing::info!("HTTP server closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_weather_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/weather/current",
            "/api/weather/forecast",
            "/api/weather/search",
            "/api/weather/astronomy",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    /// Serve a one-route app behind `cors_layer(origin)` and return the
    /// CORS headers of a GET carrying an `Origin`.
    async fn cors_headers(origin: &str) -> reqwest::header::HeaderMap {
        let app = axum::Router::new()
            .route("/", axum::routing::get(|| async { "ok" }))
            .layer(cors_layer(origin));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let response = reqwest::Client::new()
            .get(format!("http://{}/", addr))
            .header(header::ORIGIN, "http://localhost:3000")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        response.headers().clone()
    }

    #[tokio::test]
    async fn test_cors_explicit_origin_allows_credentials() {
        let headers = cors_headers("http://localhost:3000").await;
        assert_eq!(headers["access-control-allow-origin"], "http://localhost:3000");
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn test_cors_wildcard_origin() {
        let headers = cors_headers("*").await;
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert!(headers.get("access-control-allow-credentials").is_none());
    }

    #[tokio::test]
    async fn test_cors_invalid_origin_falls_back_to_any() {
        let headers = cors_headers("bad\norigin").await;
        assert_eq!(headers["access-control-allow-origin"], "*");
    }
}
