//! Assessment persistence
//!
//! Append-only store of submissions and their outcomes. All writes in the
//! submission path are best-effort: callers log failures and move on, the
//! response to the user never depends on the store.

use crate::features::FeatureVector;
use crate::outcome::AssessmentOutcome;
use chrono::Utc;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use uniwell_common::Result;
use uuid::Uuid;

/// One stored assessment, as returned by the history endpoints
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRecord {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub responses: serde_json::Value,
    pub prediction: i64,
    pub probability: f64,
    pub analysis: serde_json::Value,
    pub source: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Open the database and ensure the assessments table exists
pub async fn init(db_path: &Path) -> Result<SqlitePool> {
    let pool = uniwell_common::db::init_database(db_path).await?;
    create_assessments_table(&pool).await?;
    Ok(pool)
}

/// Create the assessments table (idempotent)
pub async fn create_assessments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS assessments (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            responses TEXT NOT NULL,
            prediction INTEGER NOT NULL,
            probability REAL NOT NULL,
            analysis TEXT NOT NULL,
            source TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assessments_user_created
         ON assessments (user_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append a submission and its outcome
pub async fn insert_assessment(
    pool: &SqlitePool,
    user_id: &str,
    features: &FeatureVector,
    outcome: &AssessmentOutcome,
) -> Result<()> {
    let responses = serde_json::to_string(features.values())
        .map_err(|e| uniwell_common::Error::Internal(e.to_string()))?;
    let analysis = serde_json::to_string(&outcome.analysis)
        .map_err(|e| uniwell_common::Error::Internal(e.to_string()))?;

    sqlx::query(
        "INSERT INTO assessments
            (id, user_id, responses, prediction, probability, analysis, source, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(responses)
    .bind(outcome.prediction)
    .bind(outcome.probability)
    .bind(analysis)
    .bind(outcome.source.as_str())
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Stored outcomes for one user, newest first
pub async fn history_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<AssessmentRecord>> {
    let rows = sqlx::query(
        "SELECT id, user_id, responses, prediction, probability, analysis, source, created_at
         FROM assessments
         WHERE user_id = ?
         ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_record).collect())
}

/// All stored outcomes, newest first (admin view)
pub async fn all_assessments(pool: &SqlitePool) -> Result<Vec<AssessmentRecord>> {
    let rows = sqlx::query(
        "SELECT id, user_id, responses, prediction, probability, analysis, source, created_at
         FROM assessments
         ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_record).collect())
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> AssessmentRecord {
    let responses: String = row.get("responses");
    let analysis: String = row.get("analysis");
    AssessmentRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        responses: serde_json::from_str(&responses).unwrap_or(serde_json::Value::Null),
        prediction: row.get("prediction"),
        probability: row.get("probability"),
        analysis: serde_json::from_str(&analysis).unwrap_or(serde_json::Value::Null),
        source: row.get("source"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_outcome;
    use crate::features::{FeatureVector, ResponsesInput};
    use serde_json::json;

    async fn memory_pool() -> SqlitePool {
        let pool = uniwell_common::db::init_memory_database().await.unwrap();
        create_assessments_table(&pool).await.unwrap();
        pool
    }

    fn sample_features() -> FeatureVector {
        let mut map = serde_json::Map::new();
        map.insert("Age".to_string(), json!(21));
        map.insert("AcademicPressure".to_string(), json!(2));
        FeatureVector::normalize(ResponsesInput::Keyed(map)).unwrap()
    }

    #[tokio::test]
    async fn insert_then_history_roundtrip() {
        let pool = memory_pool().await;
        let features = sample_features();
        let outcome = fallback_outcome(&features);

        insert_assessment(&pool, "student-1", &features, &outcome).await.unwrap();

        let records = history_for_user(&pool, "student-1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "student-1");
        assert_eq!(records[0].prediction, outcome.prediction);
        assert_eq!(records[0].source, "fallback");
        assert_eq!(records[0].responses.as_array().unwrap().len(), 17);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let pool = memory_pool().await;
        let features = sample_features();
        let outcome = fallback_outcome(&features);

        for _ in 0..3 {
            insert_assessment(&pool, "student-1", &features, &outcome).await.unwrap();
        }

        let records = history_for_user(&pool, "student-1").await.unwrap();
        assert_eq!(records.len(), 3);
        let mut sorted = records.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let order: Vec<&str> = records.iter().map(|r| r.created_at.as_str()).collect();
        let expected: Vec<&str> = sorted.iter().map(|r| r.created_at.as_str()).collect();
        assert_eq!(order, expected);
    }

    #[tokio::test]
    async fn history_for_unknown_user_is_empty() {
        let pool = memory_pool().await;
        let records = history_for_user(&pool, "nobody").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn all_assessments_spans_users() {
        let pool = memory_pool().await;
        let features = sample_features();
        let outcome = fallback_outcome(&features);

        insert_assessment(&pool, "a", &features, &outcome).await.unwrap();
        insert_assessment(&pool, "b", &features, &outcome).await.unwrap();

        let records = all_assessments(&pool).await.unwrap();
        assert_eq!(records.len(), 2);
    }
}
