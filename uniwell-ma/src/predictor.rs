//! Prediction service client
//!
//! Sends normalized feature vectors to the remote ML predictor. Transport
//! failures are classified so the pipeline can tell "nothing is listening"
//! (connection refused, recoverable via the local heuristic) apart from
//! "listening but slow or erroring" (timeout / upstream error, surfaced to
//! the caller unmodified).

use crate::features::FeatureVector;
use crate::outcome::Prediction;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Bound on a prediction round-trip
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound on the liveness probe (health checks must stay fast)
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors from the prediction service
#[derive(Debug, Error)]
pub enum PredictError {
    /// Nothing is listening at the predictor address
    #[error("Predictor connection refused: {0}")]
    ConnectionRefused(String),

    /// The predictor exceeded the time bound; the request is abandoned
    #[error("Predictor timed out: {0}")]
    Timeout(String),

    /// Predictor reachable but returned a non-2xx response
    #[error("Predictor returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Response arrived but could not be decoded
    #[error("Failed to parse predictor response: {0}")]
    Parse(String),

    /// Any other transport failure
    #[error("Predictor request failed: {0}")]
    Network(String),
}

/// HTTP client for the prediction service
pub struct PredictorClient {
    http_client: Client,
    base_url: String,
}

impl PredictorClient {
    pub fn new(base_url: String) -> Result<Self, uniwell_common::Error> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Construct with a custom request timeout (tests use short bounds)
    pub fn with_timeout(
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, uniwell_common::Error> {
        let http_client = Client::builder().timeout(timeout).build().map_err(|e| {
            uniwell_common::Error::Internal(format!("Failed to create HTTP client: {}", e))
        })?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request a prediction for a normalized feature vector
    pub async fn predict(&self, features: &FeatureVector) -> Result<Prediction, PredictError> {
        debug!(predictor = %self.base_url, "Requesting prediction");

        let response = self
            .http_client
            .post(format!("{}/predict", self.base_url))
            .json(&json!({ "responses": features.values() }))
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictError::Api { status: status.as_u16(), body });
        }

        response
            .json::<Prediction>()
            .await
            .map_err(|e| PredictError::Parse(e.to_string()))
    }

    /// Probe the predictor's own health endpoint
    ///
    /// Unreachable is a value here, not an error: returns None when the
    /// probe fails for any reason.
    pub async fn health(&self) -> Option<Value> {
        let response = self
            .http_client
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }
        response.json::<Value>().await.ok()
    }
}

fn classify_transport_error(e: reqwest::Error) -> PredictError {
    if e.is_timeout() {
        PredictError::Timeout(e.to_string())
    } else if e.is_connect() {
        PredictError::ConnectionRefused(e.to_string())
    } else {
        PredictError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureVector, ResponsesInput};
    use serde_json::json;

    fn test_vector() -> FeatureVector {
        let values = (0..17).map(|_| json!("")).collect();
        FeatureVector::normalize(ResponsesInput::Ordered(values)).unwrap()
    }

    /// Bind-then-drop a listener to obtain a port that refuses connections
    async fn refused_port() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn unreachable_predictor_is_connection_refused() {
        let port = refused_port().await;
        let client = PredictorClient::new(format!("http://127.0.0.1:{}", port)).unwrap();

        let err = client.predict(&test_vector()).await.unwrap_err();
        assert!(matches!(err, PredictError::ConnectionRefused(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn silent_predictor_is_a_timeout() {
        // A listener that accepts but never responds
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let client = PredictorClient::with_timeout(
            format!("http://127.0.0.1:{}", port),
            Duration::from_millis(300),
        )
        .unwrap();

        let err = client.predict(&test_vector()).await.unwrap_err();
        assert!(matches!(err, PredictError::Timeout(_)), "got {:?}", err);
        server.abort();
    }

    #[tokio::test]
    async fn health_probe_of_unreachable_predictor_is_none() {
        let port = refused_port().await;
        let client = PredictorClient::new(format!("http://127.0.0.1:{}", port)).unwrap();
        assert!(client.health().await.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = PredictorClient::new("http://127.0.0.1:5001/".to_string()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5001");
    }
}
