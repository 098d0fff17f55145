//! Session status endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::AppState;

/// Response of GET /api/session/:session
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// GET /api/session/:session
///
/// Reports whether a credential is stored for the session and when it
/// expires. Never an error; an unknown session is simply unauthenticated.
pub async fn session_status(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Json<SessionStatus> {
    match state.lifecycle.store().read(&session).await {
        Some(credential) => Json(SessionStatus {
            authenticated: true,
            expires_at: credential.expires_at.map(|t| t.to_rfc3339()),
        }),
        None => Json(SessionStatus { authenticated: false, expires_at: None }),
    }
}
