//! Assessment outcome types
//!
//! Mirrors the predictor's response contract field-for-name so remote
//! outcomes pass through verbatim; the local fallback builds the same
//! shape. Outcomes are immutable once created.

use serde::{Deserialize, Serialize};

/// Where an outcome came from: the remote predictor or the local heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeSource {
    Remote,
    Fallback,
}

impl OutcomeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeSource::Remote => "remote",
            OutcomeSource::Fallback => "fallback",
        }
    }
}

/// Predictor wire response (also the persisted analysis shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: i64,
    pub probability: f64,
    pub analysis: Analysis,
    #[serde(default)]
    pub safety_override: bool,
}

/// Detailed analysis block attached to every prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub risk_level: String,
    pub risk_color: String,
    pub description: String,
    pub probability_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<i64>,
    pub suggestions: Vec<String>,
    pub professional_resources: ProfessionalResources,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessionalResources {
    pub crisis_lines: Vec<String>,
    pub online_resources: Vec<String>,
}

/// A completed assessment outcome, tagged with its source
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentOutcome {
    pub prediction: i64,
    pub probability: f64,
    pub analysis: Analysis,
    pub safety_override: bool,
    pub source: OutcomeSource,
}

impl AssessmentOutcome {
    /// Wrap a remote prediction verbatim
    pub fn remote(prediction: Prediction) -> Self {
        Self {
            prediction: prediction.prediction,
            probability: prediction.probability,
            analysis: prediction.analysis,
            safety_override: prediction.safety_override,
            source: OutcomeSource::Remote,
        }
    }
}
