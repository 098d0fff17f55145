//! Canonical feature vector for assessment submissions
//!
//! The predictor's wire contract is positional: exactly 17 values in a
//! fixed order. Submissions arrive either as an already-ordered array or as
//! an object keyed by field name; both are projected into the canonical
//! layout here, with an empty-string sentinel for anything absent.
//!
//! The local risk heuristic never touches raw indices; it reads the
//! handful of fields it cares about through the named accessors below, so a
//! future reordering of the canonical list cannot silently misclassify.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uniwell_common::{Error, Result};

/// Canonical field order shared with the predictor
pub const CANONICAL_FIELDS: [&str; 17] = [
    "id",
    "Gender",
    "Age",
    "City",
    "Profession",
    "AcademicPressure",
    "WorkPressure",
    "CGPA",
    "StudySatisfaction",
    "JobSatisfaction",
    "SleepDuration",
    "DietaryHabits",
    "Degree",
    "SuicidalThoughts",
    "WorkStudyHours",
    "FinancialStress",
    "FamilyHistory",
];

/// Raw submission payload: ordered values or a map keyed by field name
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResponsesInput {
    Ordered(Vec<Value>),
    Keyed(serde_json::Map<String, Value>),
}

/// A normalized, fixed-order feature vector (always 17 positions)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector(Vec<Value>);

impl FeatureVector {
    /// Project raw input into the canonical layout
    ///
    /// Keyed input is reordered by field name with `""` for absent keys;
    /// ordered input is padded (or truncated) to the canonical length.
    /// Input with no recognizable fields at all is a validation error.
    pub fn normalize(input: ResponsesInput) -> Result<Self> {
        match input {
            ResponsesInput::Ordered(values) => {
                if values.is_empty() {
                    return Err(Error::Validation("No valid responses found".to_string()));
                }
                let mut values = values;
                values.resize(CANONICAL_FIELDS.len(), Value::String(String::new()));
                values.truncate(CANONICAL_FIELDS.len());
                Ok(Self(values))
            }
            ResponsesInput::Keyed(map) => {
                let recognized = CANONICAL_FIELDS
                    .iter()
                    .any(|field| map.get(*field).map(|v| !v.is_null()).unwrap_or(false));
                if !recognized {
                    return Err(Error::Validation("No valid responses found".to_string()));
                }
                let values = CANONICAL_FIELDS
                    .iter()
                    .map(|field| {
                        map.get(*field)
                            .filter(|v| !v.is_null())
                            .cloned()
                            .unwrap_or_else(|| Value::String(String::new()))
                    })
                    .collect();
                Ok(Self(values))
            }
        }
    }

    /// The ordered values sent to the predictor
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    fn field(&self, name: &str) -> &Value {
        let position = CANONICAL_FIELDS
            .iter()
            .position(|f| *f == name)
            .expect("field name is a member of CANONICAL_FIELDS");
        &self.0[position]
    }

    fn numeric_field(&self, name: &str) -> Option<f64> {
        match self.field(name) {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Whether the submission reports suicidal ideation
    ///
    /// Accepts the same truthy spellings as the predictor: yes/true/1/y,
    /// case-insensitive.
    pub fn suicidal_ideation(&self) -> bool {
        match self.field("SuicidalThoughts") {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() == Some(1.0),
            Value::String(s) => {
                matches!(s.trim().to_lowercase().as_str(), "yes" | "true" | "1" | "y")
            }
            _ => false,
        }
    }

    pub fn academic_pressure(&self) -> Option<f64> {
        self.numeric_field("AcademicPressure")
    }

    pub fn work_pressure(&self) -> Option<f64> {
        self.numeric_field("WorkPressure")
    }

    pub fn sleep_duration(&self) -> Option<f64> {
        self.numeric_field("SleepDuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keyed(pairs: &[(&str, Value)]) -> ResponsesInput {
        let mut map = serde_json::Map::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        ResponsesInput::Keyed(map)
    }

    #[test]
    fn normalize_is_idempotent_on_canonical_vectors() {
        let canonical: Vec<Value> = (0..17).map(|i| json!(format!("v{}", i))).collect();
        let first = FeatureVector::normalize(ResponsesInput::Ordered(canonical.clone())).unwrap();
        let second =
            FeatureVector::normalize(ResponsesInput::Ordered(first.values().to_vec())).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.values(), canonical.as_slice());
    }

    #[test]
    fn empty_mapping_fails_validation() {
        let err = FeatureVector::normalize(keyed(&[])).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn empty_ordered_input_fails_validation() {
        let err = FeatureVector::normalize(ResponsesInput::Ordered(vec![])).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn mapping_with_only_unknown_keys_fails_validation() {
        let err = FeatureVector::normalize(keyed(&[("Unknown", json!("x"))])).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn keyed_input_lands_at_canonical_positions() {
        let vector =
            FeatureVector::normalize(keyed(&[("SuicidalThoughts", json!("Yes"))])).unwrap();
        assert_eq!(vector.values().len(), 17);
        // Ideation flag occupies the canonical fixed position
        assert_eq!(vector.values()[13], json!("Yes"));
        // Everything else is the empty sentinel, never omitted
        assert_eq!(vector.values()[0], json!(""));
        assert_eq!(vector.values()[16], json!(""));
        assert!(vector.suicidal_ideation());
    }

    #[test]
    fn short_ordered_input_is_padded_to_canonical_length() {
        let vector =
            FeatureVector::normalize(ResponsesInput::Ordered(vec![json!("student1")])).unwrap();
        assert_eq!(vector.values().len(), 17);
        assert_eq!(vector.values()[1], json!(""));
    }

    #[test]
    fn overlong_ordered_input_is_truncated() {
        let values: Vec<Value> = (0..25).map(|i| json!(i)).collect();
        let vector = FeatureVector::normalize(ResponsesInput::Ordered(values)).unwrap();
        assert_eq!(vector.values().len(), 17);
    }

    #[test]
    fn ideation_flag_accepts_truthy_spellings() {
        for spelling in ["Yes", "yes", "TRUE", "1", "y"] {
            let vector =
                FeatureVector::normalize(keyed(&[("SuicidalThoughts", json!(spelling))])).unwrap();
            assert!(vector.suicidal_ideation(), "{:?} should be truthy", spelling);
        }
        for spelling in ["No", "", "0", "n"] {
            let vector = FeatureVector::normalize(keyed(&[
                ("SuicidalThoughts", json!(spelling)),
                ("Age", json!(20)),
            ]))
            .unwrap();
            assert!(!vector.suicidal_ideation(), "{:?} should be falsy", spelling);
        }
    }

    #[test]
    fn numeric_fields_parse_numbers_and_strings() {
        let vector = FeatureVector::normalize(keyed(&[
            ("AcademicPressure", json!(4)),
            ("WorkPressure", json!("3.5")),
            ("SleepDuration", json!("")),
        ]))
        .unwrap();
        assert_eq!(vector.academic_pressure(), Some(4.0));
        assert_eq!(vector.work_pressure(), Some(3.5));
        assert_eq!(vector.sleep_duration(), None);
    }
}
