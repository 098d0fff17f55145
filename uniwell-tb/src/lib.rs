//! uniwell-tb library - Token Broker module
//!
//! Wraps the Spotify OAuth flow: code exchange, proactive refresh on a
//! self-perpetuating timer, logout, and a small Web API surface (admin
//! playlist listing via the client-credentials flow).

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod lifecycle;
pub mod spotify;
pub mod store;

use config::Settings;
use lifecycle::TokenLifecycle;
use spotify::SpotifyClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<TokenLifecycle>,
    pub spotify: Arc<SpotifyClient>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        lifecycle: Arc<TokenLifecycle>,
        spotify: Arc<SpotifyClient>,
        settings: Settings,
    ) -> Self {
        Self { lifecycle, spotify, settings: Arc::new(settings) }
    }
}

/// Build application router
///
/// All routes are CORS-open to the frontends; there is no additional auth
/// layer on this service (it is the auth layer).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/api/token", post(api::exchange_token))
        .route("/api/refresh", post(api::refresh_token))
        .route("/api/logout", post(api::logout))
        .route("/api/session/:session", get(api::session_status))
        .route("/admin-playlists", get(api::admin_playlists))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
