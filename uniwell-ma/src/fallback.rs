//! Local fallback risk heuristic
//!
//! Runs only when the predictor is unreachable (connection refused). Reads
//! four named fields of the feature vector and classifies with a fixed
//! branch precedence: the ideation check comes first and unconditionally
//! overrides every other branch. Do not reorder these branches or fold them
//! into a scoring function; the order IS the crisis-detection behavior.

use crate::features::FeatureVector;
use crate::outcome::{Analysis, AssessmentOutcome, OutcomeSource, ProfessionalResources};

/// Risk classification produced by the heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Wire label, matching the predictor's own vocabulary
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::Critical => "CRITICAL RISK",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Moderate => "yellow",
            RiskLevel::High => "red",
            RiskLevel::Critical => "darkred",
        }
    }

    pub fn probability(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.20,
            RiskLevel::Moderate => 0.50,
            RiskLevel::High => 0.70,
            RiskLevel::Critical => 0.95,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "IMMEDIATE PROFESSIONAL INTERVENTION REQUIRED",
            _ => "Assessment completed (ML service unavailable)",
        }
    }

    fn suggestions(&self) -> Vec<String> {
        let items: &[&str] = match self {
            RiskLevel::Critical => &[
                "CALL 911 or go to your nearest emergency room immediately",
                "Contact the National Suicide Prevention Lifeline: 988",
                "Do not leave the person alone - stay with them or have someone stay with them",
            ],
            RiskLevel::High => &[
                "Seek professional mental health support immediately",
                "Contact your healthcare provider or a mental health crisis line",
                "Consider campus counseling services if you're a student",
            ],
            RiskLevel::Moderate => &[
                "Consider speaking with a mental health counselor",
                "Practice stress reduction techniques like mindfulness",
                "Evaluate your workload and consider adjustments if possible",
            ],
            RiskLevel::Low => &[
                "Continue maintaining healthy lifestyle habits",
                "Practice stress management techniques",
                "Maintain regular sleep schedule",
            ],
        };
        items.iter().map(|s| s.to_string()).collect()
    }

    fn next_steps(&self) -> Vec<String> {
        let items: &[&str] = match self {
            RiskLevel::Critical => &["IMMEDIATE ACTION: Call 911 or go to emergency room"],
            _ => &[
                "Schedule a follow-up assessment",
                "Consider professional consultation",
            ],
        };
        items.iter().map(|s| s.to_string()).collect()
    }
}

fn professional_resources() -> ProfessionalResources {
    ProfessionalResources {
        crisis_lines: vec![
            "National Suicide Prevention Lifeline: 988".to_string(),
            "Crisis Text Line: Text HOME to 741741".to_string(),
            "SAMHSA National Helpline: 1-800-662-4357".to_string(),
        ],
        online_resources: vec![
            "Mental Health America: mhanational.org".to_string(),
            "National Alliance on Mental Illness: nami.org".to_string(),
            "Psychology Today Therapist Finder: psychologytoday.com".to_string(),
        ],
    }
}

/// Classify a submission without the remote model
///
/// Branch order is a deliberate severity tie-break:
/// 1. ideation reported → Critical, regardless of every other field
/// 2. high academic AND work pressure AND short sleep → High
/// 3. high academic OR work pressure → Moderate
/// 4. otherwise → Low
pub fn classify(features: &FeatureVector) -> RiskLevel {
    let high_academic = features.academic_pressure().map(|p| p >= 3.0).unwrap_or(false);
    let high_work = features.work_pressure().map(|p| p >= 3.0).unwrap_or(false);
    let poor_sleep = features.sleep_duration().map(|h| h < 4.0).unwrap_or(false);

    if features.suicidal_ideation() {
        RiskLevel::Critical
    } else if high_academic && high_work && poor_sleep {
        RiskLevel::High
    } else if high_academic || high_work {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Build the full fallback outcome for a submission
pub fn fallback_outcome(features: &FeatureVector) -> AssessmentOutcome {
    let risk = classify(features);
    let probability = risk.probability();
    let prediction = if risk == RiskLevel::Low { 0 } else { 1 };

    AssessmentOutcome {
        prediction,
        probability,
        analysis: Analysis {
            risk_level: risk.label().to_string(),
            risk_color: risk.color().to_string(),
            description: risk.description().to_string(),
            probability_percentage: (probability * 100.0).round(),
            prediction: Some(prediction),
            suggestions: risk.suggestions(),
            professional_resources: professional_resources(),
            next_steps: risk.next_steps(),
        },
        safety_override: risk == RiskLevel::Critical,
        source: OutcomeSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ResponsesInput;
    use serde_json::{json, Value};

    fn vector(
        ideation: &str,
        academic: Value,
        work: Value,
        sleep: Value,
    ) -> FeatureVector {
        let mut map = serde_json::Map::new();
        map.insert("SuicidalThoughts".to_string(), json!(ideation));
        map.insert("AcademicPressure".to_string(), academic);
        map.insert("WorkPressure".to_string(), work);
        map.insert("SleepDuration".to_string(), sleep);
        FeatureVector::normalize(ResponsesInput::Keyed(map)).unwrap()
    }

    #[test]
    fn ideation_forces_critical_regardless_of_other_fields() {
        // Arbitrary other values: the ideation branch overrides them all
        for (academic, work, sleep) in
            [(json!(0), json!(0), json!(9)), (json!(5), json!(5), json!(1)), (json!(""), json!(""), json!(""))]
        {
            let features = vector("Yes", academic, work, sleep);
            assert_eq!(classify(&features), RiskLevel::Critical);

            let outcome = fallback_outcome(&features);
            assert_eq!(outcome.analysis.risk_level, "CRITICAL RISK");
            assert_eq!(outcome.probability, 0.95);
            assert_eq!(outcome.prediction, 1);
            assert!(outcome.safety_override);
            assert!(outcome.analysis.suggestions[0].contains("911"));
        }
    }

    #[test]
    fn combined_pressure_and_short_sleep_is_high() {
        let features = vector("No", json!(4), json!(4), json!(2));
        assert_eq!(classify(&features), RiskLevel::High);

        let outcome = fallback_outcome(&features);
        assert_eq!(outcome.analysis.risk_level, "High Risk");
        assert_eq!(outcome.probability, 0.70);
        assert!(!outcome.safety_override);
    }

    #[test]
    fn single_pressure_scale_is_moderate() {
        let features = vector("No", json!(4), json!(1), json!(8));
        assert_eq!(classify(&features), RiskLevel::Moderate);
        assert_eq!(fallback_outcome(&features).probability, 0.50);

        let features = vector("No", json!(1), json!(3), json!(8));
        assert_eq!(classify(&features), RiskLevel::Moderate);
    }

    #[test]
    fn calm_profile_is_low() {
        let features = vector("No", json!(1), json!(1), json!(8));
        assert_eq!(classify(&features), RiskLevel::Low);

        let outcome = fallback_outcome(&features);
        assert_eq!(outcome.analysis.risk_level, "Low Risk");
        assert_eq!(outcome.probability, 0.20);
        assert_eq!(outcome.prediction, 0);
    }

    #[test]
    fn missing_fields_never_trip_a_branch() {
        let features = vector("", json!(""), json!(""), json!(""));
        assert_eq!(classify(&features), RiskLevel::Low);
    }

    #[test]
    fn both_pressures_without_poor_sleep_is_moderate_not_high() {
        let features = vector("No", json!(4), json!(4), json!(7));
        assert_eq!(classify(&features), RiskLevel::Moderate);
    }

    #[test]
    fn outcome_is_tagged_fallback() {
        let features = vector("No", json!(1), json!(1), json!(8));
        assert_eq!(fallback_outcome(&features).source, OutcomeSource::Fallback);
    }
}
