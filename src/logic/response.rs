//! Response Assembler
//!
//! [`InferenceResult`] is the only thing the pipeline hands back. The enum
//! guarantees exactly one of success/failure; serialization flattens it to
//! the `{ success, prediction | error, features, timestamp }` envelope.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::logic::features::FeatureRecord;

// ============================================================================
// FAILURE KINDS
// ============================================================================

/// Why a request failed, used by the transport to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    ResourceUnavailable,
    UnrecognizedClass,
    Unexpected,
}

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub stress_state: String,
    pub stress_level: String,
    pub description: String,
    pub severity: u8,
    pub confidence: f64,
    /// Keyed by class label
    pub probabilities: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Success {
    pub class_index: usize,
    pub prediction: Prediction,
    pub features: BTreeMap<String, f64>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub error: String,
    pub details: Option<String>,
    pub features: Option<BTreeMap<String, f64>>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceResult {
    Success(Success),
    Failure(Failure),
}

/// ISO-8601 UTC timestamp
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl InferenceResult {
    pub fn success(class_index: usize, prediction: Prediction, record: &FeatureRecord) -> Self {
        InferenceResult::Success(Success {
            class_index,
            prediction,
            features: record.to_map(),
            timestamp: timestamp_now(),
        })
    }

    pub fn failure(kind: FailureKind, error: impl Into<String>) -> Self {
        InferenceResult::Failure(Failure {
            kind,
            error: error.into(),
            details: None,
            features: None,
            timestamp: timestamp_now(),
        })
    }

    /// Attach a detail string (failures only)
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        if let InferenceResult::Failure(failure) = &mut self {
            failure.details = Some(details.into());
        }
        self
    }

    /// Echo the received features (failures only; successes always echo)
    pub fn with_features(mut self, record: &FeatureRecord) -> Self {
        if let InferenceResult::Failure(failure) = &mut self {
            failure.features = Some(record.to_map());
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InferenceResult::Success(_))
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            InferenceResult::Success(success) => Some(&success.prediction),
            InferenceResult::Failure(_) => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            InferenceResult::Success(_) => None,
            InferenceResult::Failure(failure) => Some(failure.kind),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            InferenceResult::Success(_) => None,
            InferenceResult::Failure(failure) => Some(&failure.error),
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            InferenceResult::Success(success) => &success.timestamp,
            InferenceResult::Failure(failure) => &failure.timestamp,
        }
    }

    /// Deprecated `{ isSuccessful, prediction, confidence, features_received }` shape
    pub fn legacy_view(&self) -> LegacyPredictionView {
        match self {
            InferenceResult::Success(success) => LegacyPredictionView {
                is_successful: true,
                prediction: Some(success.class_index),
                confidence: success.prediction.confidence,
                features_received: success.features.clone(),
                error: None,
            },
            InferenceResult::Failure(failure) => LegacyPredictionView {
                is_successful: false,
                prediction: None,
                confidence: 0.0,
                features_received: failure.features.clone().unwrap_or_default(),
                error: Some(failure.error.clone()),
            },
        }
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

#[derive(Serialize)]
struct Envelope<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<&'a Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<&'a BTreeMap<String, f64>>,
    timestamp: &'a str,
}

impl Serialize for InferenceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let envelope = match self {
            InferenceResult::Success(success) => Envelope {
                success: true,
                prediction: Some(&success.prediction),
                error: None,
                details: None,
                features: Some(&success.features),
                timestamp: &success.timestamp,
            },
            InferenceResult::Failure(failure) => Envelope {
                success: false,
                prediction: None,
                error: Some(&failure.error),
                details: failure.details.as_deref(),
                features: failure.features.as_ref(),
                timestamp: &failure.timestamp,
            },
        };
        envelope.serialize(serializer)
    }
}

/// Legacy response shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyPredictionView {
    #[serde(rename = "isSuccessful")]
    pub is_successful: bool,
    pub prediction: Option<usize>,
    pub confidence: f64,
    pub features_received: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
