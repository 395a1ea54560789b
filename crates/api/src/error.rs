//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Non-success tracking outcomes, mapped to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The tracking code was blank.
    InvalidInput,
    /// No shipment carries the tracking code.
    NotFound,
    /// Several shipments carry the tracking code.
    Ambiguous { tracking_code: String, matches: usize },
    /// The shipment store failed; the client may retry.
    Unavailable(String),
}

impl ApiError {
    /// Outcome name echoed in the response body.
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::InvalidInput => "invalid_input",
            ApiError::NotFound => "not_found",
            ApiError::Ambiguous { .. } => "ambiguous",
            ApiError::Unavailable(_) => "transient_failure",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let outcome = self.outcome();
        let (status, message) = match self {
            ApiError::InvalidInput => (
                StatusCode::BAD_REQUEST,
                "Tracking code must not be empty".to_string(),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Shipment not found".to_string()),
            ApiError::Ambiguous {
                tracking_code,
                matches,
            } => {
                tracing::error!(
                    %tracking_code,
                    matches,
                    "ambiguous tracking code served to client"
                );
                (
                    StatusCode::CONFLICT,
                    format!("Tracking code {tracking_code} matches more than one shipment"),
                )
            }
            ApiError::Unavailable(cause) => {
                tracing::warn!(error = %cause, "tracking lookup unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Tracking is temporarily unavailable, please retry".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message, "outcome": outcome });
        (status, axum::Json(body)).into_response()
    }
}
