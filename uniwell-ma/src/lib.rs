//! UniWell Mental Assessment backend
//!
//! Accepts questionnaire submissions, normalizes them into the canonical
//! feature vector, obtains a depression-risk prediction (remote model with
//! a local heuristic fallback), and keeps a best-effort history of outcomes.

pub mod api;
pub mod config;
pub mod db;
pub mod fallback;
pub mod features;
pub mod outcome;
pub mod pipeline;
pub mod predictor;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::predictor::PredictorClient;

/// Shared application state
///
/// `db` is None when the store could not be opened; the service keeps
/// running without persistence.
#[derive(Clone)]
pub struct AppState {
    pub db: Option<SqlitePool>,
    pub predictor: Arc<PredictorClient>,
}

/// Build the HTTP router with all assessment routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/submit", post(api::submit_assessment))
        .route("/api/history/:user_id", get(api::user_history))
        .route("/api/assessments", get(api::all_assessments))
        .route("/api/health", get(api::api_health))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
