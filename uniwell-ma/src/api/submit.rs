//! Assessment submission endpoint

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::api::ApiError;
use crate::features::{FeatureVector, ResponsesInput};
use crate::outcome::OutcomeSource;
use crate::pipeline::predict_with_fallback;
use crate::{db, AppState};

/// Fallback identity for submissions without a user
const ANONYMOUS_USER: &str = "anonymous";

/// `responses` stays a raw value so a shape that is neither an array nor a
/// map still gets the structured 400 below, not the extractor's plain-text
/// rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub responses: Option<serde_json::Value>,
}

/// POST /api/submit
///
/// Normalizes the submitted responses, obtains a risk prediction, persists
/// the outcome best-effort, and returns the analysis. A persistence failure
/// never changes the response.
pub async fn submit_assessment(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let raw = request
        .responses
        .ok_or_else(|| ApiError::Validation("No responses provided".to_string()))?;
    let responses: ResponsesInput = serde_json::from_value(raw)
        .map_err(|_| ApiError::Validation("No valid responses found".to_string()))?;

    let features = FeatureVector::normalize(responses).map_err(|e| match e {
        uniwell_common::Error::Validation(msg) => ApiError::Validation(msg),
        other => ApiError::Internal(other.to_string()),
    })?;

    let outcome = predict_with_fallback(&state.predictor, &features).await?;

    let user_id = request.user_id.as_deref().unwrap_or(ANONYMOUS_USER);
    info!(
        user_id = %user_id,
        source = outcome.source.as_str(),
        risk = %outcome.analysis.risk_level,
        "Assessment completed"
    );

    if let Some(pool) = &state.db {
        if let Err(e) = db::insert_assessment(pool, user_id, &features, &outcome).await {
            warn!("Failed to persist assessment for {}: {}", user_id, e);
        }
    }

    Ok(Json(json!({
        "success": true,
        "prediction": outcome.prediction,
        "probability": outcome.probability,
        "analysis": outcome.analysis,
        "timestamp": Utc::now().to_rfc3339(),
        "fallback_used": outcome.source == OutcomeSource::Fallback,
        "safety_override": outcome.safety_override,
    })))
}
