//! Submission pipeline: predict with local fallback
//!
//! Connection-refused is the one failure recovered locally; the heuristic
//! stands in for a predictor that is not running. A predictor that is
//! reachable but slow or erroring is never masked; those failures propagate
//! to the caller unmodified.

use crate::fallback::fallback_outcome;
use crate::features::FeatureVector;
use crate::outcome::AssessmentOutcome;
use crate::predictor::{PredictError, PredictorClient};
use tracing::warn;

/// Run the prediction step of a submission
pub async fn predict_with_fallback(
    predictor: &PredictorClient,
    features: &FeatureVector,
) -> Result<AssessmentOutcome, PredictError> {
    match predictor.predict(features).await {
        Ok(prediction) => Ok(AssessmentOutcome::remote(prediction)),
        Err(PredictError::ConnectionRefused(reason)) => {
            warn!("Predictor unreachable, using local fallback heuristic: {}", reason);
            Ok(fallback_outcome(features))
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ResponsesInput;
    use crate::outcome::OutcomeSource;
    use serde_json::json;
    use std::time::Duration;

    fn keyed_vector(pairs: &[(&str, serde_json::Value)]) -> FeatureVector {
        let mut map = serde_json::Map::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        FeatureVector::normalize(ResponsesInput::Keyed(map)).unwrap()
    }

    async fn refused_client() -> PredictorClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        PredictorClient::new(format!("http://127.0.0.1:{}", port)).unwrap()
    }

    #[tokio::test]
    async fn connection_refused_never_errors() {
        let predictor = refused_client().await;
        let features = keyed_vector(&[("Age", json!(20))]);

        let outcome = predict_with_fallback(&predictor, &features)
            .await
            .expect("connection refused must be recovered locally");
        assert_eq!(outcome.source, OutcomeSource::Fallback);
    }

    #[tokio::test]
    async fn fallback_applies_the_safety_override() {
        let predictor = refused_client().await;
        let features = keyed_vector(&[("SuicidalThoughts", json!("Yes"))]);

        let outcome = predict_with_fallback(&predictor, &features).await.unwrap();
        assert_eq!(outcome.analysis.risk_level, "CRITICAL RISK");
        assert_eq!(outcome.probability, 0.95);
        assert!(outcome.safety_override);
    }

    #[tokio::test]
    async fn timeout_propagates_instead_of_falling_back() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let predictor = PredictorClient::with_timeout(
            format!("http://127.0.0.1:{}", port),
            Duration::from_millis(300),
        )
        .unwrap();
        let features = keyed_vector(&[("Age", json!(20))]);

        let err = predict_with_fallback(&predictor, &features).await.unwrap_err();
        assert!(matches!(err, PredictError::Timeout(_)), "got {:?}", err);
        server.abort();
    }
}
