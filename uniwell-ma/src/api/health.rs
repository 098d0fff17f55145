//! Health endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::AppState;

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "uniwell-ma",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/health
///
/// Aggregate probe covering the backend itself, the database connection,
/// and the downstream prediction service.
pub async fn api_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = if state.db.is_some() { "connected" } else { "disconnected" };

    let ml_service = match state.predictor.health().await {
        Some(status) => status,
        None => json!({
            "status": "unreachable",
            "url": state.predictor.base_url(),
        }),
    };

    Json(json!({
        "backend": "healthy",
        "database": database,
        "ml_service": ml_service,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
