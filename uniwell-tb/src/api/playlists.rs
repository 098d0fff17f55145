//! Admin playlists endpoint (client-credentials flow)

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::ApiError;
use crate::spotify::PlaylistSummary;
use crate::AppState;

/// GET /admin-playlists
///
/// Acquires an app token via the client-credentials grant, then lists the
/// configured admin user's public playlists as `{name, id}` pairs.
pub async fn admin_playlists(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlaylistSummary>>, ApiError> {
    let admin_user_id = state.settings.admin_user_id.as_deref().ok_or_else(|| {
        ApiError::NotConfigured("Admin user id not configured (ADMIN_USER_ID)".to_string())
    })?;

    let grant = state.spotify.client_credentials_grant().await?;
    let playlists = state
        .spotify
        .user_playlists(&grant.access_token, admin_user_id)
        .await?;

    debug!(count = playlists.len(), "Fetched admin playlists");
    Ok(Json(playlists))
}
