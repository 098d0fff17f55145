//! HTTP API handlers for uniwell-tb

pub mod health;
pub mod playlists;
pub mod session;
pub mod token;

pub use health::health_routes;
pub use playlists::admin_playlists;
pub use session::session_status;
pub use token::{callback, exchange_token, login, logout, refresh_token};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uniwell_common::Error;

/// Session key used when the request does not name one
pub(crate) const DEFAULT_SESSION: &str = "default";

/// Token broker API errors
#[derive(Debug)]
pub enum ApiError {
    /// Request is missing the one-time authorization code
    MissingCode,
    /// Malformed request input
    BadRequest(String),
    /// Refresh failed; the session was cleared and re-auth is required
    SessionExpired(String),
    /// Identity provider or Web API error, passed through verbatim
    Upstream { status: u16, body: String },
    /// Upstream call exceeded its time bound
    Timeout(String),
    /// Required configuration is absent
    NotConfigured(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::UpstreamAuth { status, body } | Error::Upstream { status, body } => {
                ApiError::Upstream { status, body }
            }
            Error::UpstreamTimeout(msg) => ApiError::Timeout(msg),
            Error::Config(msg) => ApiError::NotConfigured(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingCode => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Authorization code is required" })),
            )
                .into_response(),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::SessionExpired(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Upstream { status, body } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                // Pass the provider's error body through verbatim when it is
                // valid JSON; otherwise wrap it
                let payload = serde_json::from_str::<serde_json::Value>(&body)
                    .unwrap_or_else(|_| json!({ "error": body }));
                (status, Json(payload)).into_response()
            }
            ApiError::Timeout(msg) => {
                (StatusCode::REQUEST_TIMEOUT, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::NotConfigured(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}
