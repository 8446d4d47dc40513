/// Default Open-Meteo geocoding endpoint.
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
/// Default Open-Meteo forecast endpoint.
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
/// Timeout applied to every upstream call.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
/// Upper bound on handling one inbound request, upstream calls included.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub geocoding_url: String,
    pub weather_url: String,
    pub upstream_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Allowed CORS origin. `*` allows any origin.
    pub cors_origin: String,
    pub user_agent: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            geocoding_url: std::env::var("GEOCODING_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODING_URL.to_string()),
            weather_url: std::env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_URL.to_string()),
            upstream_timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            user_agent: std::env::var("USER_AGENT")
                .unwrap_or_else(|_| format!("WeatherLookup/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}
