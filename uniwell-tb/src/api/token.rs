//! Authorization code exchange, refresh, and logout endpoints

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uniwell_common::Error;

use crate::api::{ApiError, DEFAULT_SESSION};
use crate::lifecycle::TokenGrant;
use crate::AppState;

/// Body of POST /api/token
#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    pub code: Option<String>,
    pub session: Option<String>,
}

/// Body of POST /api/refresh and POST /api/logout
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub session: Option<String>,
}

/// Query parameters of GET /callback
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub session: Option<String>,
}

/// GET /login
///
/// Redirects the browser to the provider's authorize page with the full
/// scope set and `show_dialog=true`.
pub async fn login(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.spotify.authorize_url())
}

/// POST /api/token
///
/// Exchanges a one-time authorization code for a token pair. The provider's
/// error payload and status pass through verbatim on failure.
pub async fn exchange_token(
    State(state): State<AppState>,
    Json(request): Json<ExchangeRequest>,
) -> Result<Json<TokenGrant>, ApiError> {
    let code = request.code.filter(|c| !c.trim().is_empty()).ok_or(ApiError::MissingCode)?;
    let session = request.session.as_deref().unwrap_or(DEFAULT_SESSION);

    let grant = state.lifecycle.exchange(session, &code).await?;
    Ok(Json(grant))
}

/// GET /callback
///
/// Authorization redirect target. The one-time code is consumed here and
/// the browser is sent to a code-free return URL immediately, so the code
/// never survives in a client-visible location.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, ApiError> {
    let session = query.session.as_deref().unwrap_or(DEFAULT_SESSION);

    if let Some(provider_error) = query.error {
        warn!(session = %session, "Authorization denied by provider: {}", provider_error);
        state.lifecycle.logout(session).await;
        return Ok(Redirect::temporary(&state.settings.return_url));
    }

    let code = query.code.filter(|c| !c.trim().is_empty()).ok_or(ApiError::MissingCode)?;
    state.lifecycle.exchange(session, &code).await?;
    info!(session = %session, "Authorization callback completed");

    Ok(Redirect::temporary(&state.settings.return_url))
}

/// POST /api/refresh
///
/// Refreshes the session's access credential from its stored refresh
/// credential. Any failure clears the session and reports 401 so the
/// caller falls back to re-authentication.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<TokenGrant>, ApiError> {
    let session = request.session.as_deref().unwrap_or(DEFAULT_SESSION);

    match state.lifecycle.refresh(session).await {
        Ok(grant) => Ok(Json(grant)),
        Err(Error::UpstreamAuth { .. }) | Err(Error::Validation(_)) => {
            Err(ApiError::SessionExpired(
                "Session expired, re-authentication required".to_string(),
            ))
        }
        Err(other) => Err(other.into()),
    }
}

/// POST /api/logout
///
/// Clears the session's credentials and cancels any pending renewal timer.
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Json<serde_json::Value> {
    let session = request.session.as_deref().unwrap_or(DEFAULT_SESSION);
    state.lifecycle.logout(session).await;
    Json(json!({ "success": true }))
}
