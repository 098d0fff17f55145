//! Assessment history endpoints
//!
//! History reads are best-effort the same way writes are: a missing or
//! failing store yields an empty list, never an error status.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::{db, AppState};

/// GET /api/history/:user_id
pub async fn user_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<serde_json::Value> {
    let Some(pool) = &state.db else {
        return Json(json!({
            "success": true,
            "data": [],
            "count": 0,
            "message": "Database not connected",
        }));
    };

    let records = match db::history_for_user(pool, &user_id).await {
        Ok(records) => records,
        Err(e) => {
            warn!("Failed to load history for {}: {}", user_id, e);
            Vec::new()
        }
    };

    Json(json!({
        "success": true,
        "count": records.len(),
        "data": records,
    }))
}

/// GET /api/assessments
///
/// Unscoped listing across all users.
pub async fn all_assessments(State(state): State<AppState>) -> Json<serde_json::Value> {
    let Some(pool) = &state.db else {
        return Json(json!({
            "success": true,
            "data": [],
            "count": 0,
            "message": "Database not connected",
        }));
    };

    let records = match db::all_assessments(pool).await {
        Ok(records) => records,
        Err(e) => {
            warn!("Failed to load assessments: {}", e);
            Vec::new()
        }
    };

    Json(json!({
        "success": true,
        "count": records.len(),
        "data": records,
    }))
}
