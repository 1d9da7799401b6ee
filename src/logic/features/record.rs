//! Feature Record - named sensor statistics for one request
//!
//! A record is the caller's view of the input: feature name → value.
//! Completeness is checked by the vectorizer, which knows the layout;
//! this module only guarantees that every known feature it holds is a
//! real number.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::layout::FEATURE_ORDER;

// ============================================================================
// ERRORS
// ============================================================================

/// Validation errors for caller-supplied features
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("Missing feature in request: {0}")]
    MissingFeature(String),

    #[error("Invalid value for feature {name}: {reason}")]
    InvalidFeature { name: String, reason: String },

    #[error("Request body must be a JSON object of named features")]
    NotAnObject,
}

impl FeatureError {
    /// Name of the offending feature, if the error is about one
    pub fn feature(&self) -> Option<&str> {
        match self {
            FeatureError::MissingFeature(name) => Some(name),
            FeatureError::InvalidFeature { name, .. } => Some(name),
            FeatureError::NotAnObject => None,
        }
    }
}

// ============================================================================
// FEATURE RECORD
// ============================================================================

/// Named feature values, serialized as a flat JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    values: BTreeMap<String, f64>,
}

impl FeatureRecord {
    /// Build a record from a request body.
    ///
    /// Only names from the feature layout are kept; unknown keys are
    /// dropped. A known feature holding `null`, a string or any other
    /// non-numeric JSON value is rejected.
    pub fn from_json(body: &Value) -> Result<Self, FeatureError> {
        let object = body.as_object().ok_or(FeatureError::NotAnObject)?;

        let mut values = BTreeMap::new();
        for name in FEATURE_ORDER {
            let Some(raw) = object.get(name) else {
                continue;
            };

            let value = match raw {
                Value::Number(n) => n.as_f64().ok_or_else(|| FeatureError::InvalidFeature {
                    name: name.to_string(),
                    reason: "number out of range".to_string(),
                })?,
                Value::Null => {
                    return Err(FeatureError::InvalidFeature {
                        name: name.to_string(),
                        reason: "value is null".to_string(),
                    })
                }
                other => {
                    return Err(FeatureError::InvalidFeature {
                        name: name.to_string(),
                        reason: format!("expected a number, got {}", json_type(other)),
                    })
                }
            };
            values.insert(name.to_string(), value);
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Copy of the values, used when echoing the input back
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.values.clone()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureRecord {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
