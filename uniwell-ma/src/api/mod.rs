//! HTTP API handlers for uniwell-ma

pub mod health;
pub mod history;
pub mod submit;

pub use health::{api_health, health_routes};
pub use history::{all_assessments, user_history};
pub use submit::submit_assessment;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::predictor::PredictError;

/// Assessment API errors
///
/// Persistence failures never appear here; they are logged and swallowed
/// inside the submit handler.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or empty submission input
    Validation(String),
    /// Predictor exceeded its time bound
    PredictorTimeout,
    /// Predictor reachable but returned an error; status passes through
    PredictorError { status: u16, body: String },
    /// Other transport failure talking to the predictor
    PredictorUnavailable(String),
    Internal(String),
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        match e {
            PredictError::Timeout(_) => ApiError::PredictorTimeout,
            PredictError::Api { status, body } => ApiError::PredictorError { status, body },
            PredictError::Parse(msg) => ApiError::Internal(msg),
            PredictError::Network(msg) => ApiError::PredictorUnavailable(msg),
            // Connection refused is recovered by the pipeline and should
            // never reach the response layer
            PredictError::ConnectionRefused(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": msg }),
            ),
            ApiError::PredictorTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                json!({
                    "success": false,
                    "error": "Request timeout",
                    "details": "Prediction service took too long to respond",
                }),
            ),
            ApiError::PredictorError { status, body } => {
                let status = StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let details = serde_json::from_str::<serde_json::Value>(&body)
                    .unwrap_or_else(|_| json!(body));
                (
                    status,
                    json!({
                        "success": false,
                        "error": "Prediction failed",
                        "details": details,
                    }),
                )
            }
            ApiError::PredictorUnavailable(msg) => (
                StatusCode::BAD_GATEWAY,
                json!({ "success": false, "error": "Prediction service unavailable", "details": msg }),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": "Internal server error", "details": msg }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
