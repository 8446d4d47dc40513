use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Failure envelope returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub message: String,
}

/// How a failure is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadInput,
    UpstreamUnavailable,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// Missing or empty required input, or a day count out of range.
    #[error("{0}")]
    InvalidArgument(String),

    /// Geocoding produced no candidates for a non-empty query.
    #[error("{0}")]
    NotFound(String),

    /// Transport failure, timeout, non-2xx status or malformed payload.
    #[error("{message}")]
    Upstream { message: String, timed_out: bool },

    #[error("{0}")]
    Internal(String),
}

impl WeatherError {
    pub fn class(&self) -> ErrorClass {
        match self {
            WeatherError::InvalidArgument(_) | WeatherError::NotFound(_) => ErrorClass::BadInput,
            WeatherError::Upstream { .. } => ErrorClass::UpstreamUnavailable,
            WeatherError::Internal(_) => ErrorClass::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.class() {
            ErrorClass::BadInput => StatusCode::BAD_REQUEST,
            ErrorClass::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Client-level cause of a failed upstream call. Never shown to callers;
/// fetchers log it and surface a generic [`WeatherError::Upstream`].
#[derive(Debug, thiserror::Error)]
pub enum UpstreamFailure {
    #[error("request timed out: {0}")]
    Timeout(reqwest::Error),

    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamFailure::Timeout(err)
        } else if err.is_decode() {
            UpstreamFailure::Decode(err.to_string())
        } else {
            UpstreamFailure::Transport(err)
        }
    }
}

impl UpstreamFailure {
    /// Log the underlying cause and wrap it with a caller-safe message.
    pub fn into_weather_error(self, message: &str) -> WeatherError {
        tracing::warn!("{}: {}", message, self);
        WeatherError::Upstream {
            message: message.to_string(),
            timed_out: matches!(self, UpstreamFailure::Timeout(_)),
        }
    }
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            WeatherError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            WeatherError::Upstream {
                message,
                timed_out: true,
            } => tracing::warn!("{} (upstream timed out)", message),
            _ => {}
        }

        (
            status,
            axum::Json(ErrorResponse {
                success: false,
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_input_statuses() {
        assert_eq!(
            WeatherError::InvalidArgument("Location is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        // Unknown places are the caller's problem, not ours.
        assert_eq!(
            WeatherError::NotFound("Location not found".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upstream_is_service_unavailable() {
        let err = UpstreamFailure::Status(reqwest::StatusCode::BAD_GATEWAY)
            .into_weather_error("Failed to fetch forecast");
        assert_eq!(err.class(), ErrorClass::UpstreamUnavailable);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "Failed to fetch forecast");
        assert!(matches!(err, WeatherError::Upstream { timed_out: false, .. }));
    }

    #[test]
    fn test_upstream_message_hides_cause() {
        let err = UpstreamFailure::Decode("missing field `temperature_2m`".into())
            .into_weather_error("Failed to fetch current weather");
        assert!(!err.to_string().contains("temperature_2m"));
    }

    #[test]
    fn test_internal_status() {
        assert_eq!(
            WeatherError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
