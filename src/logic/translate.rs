//! Result Translator
//!
//! CHỈ chứa logic translate: class index + distribution → domain result.
//! An index without a class mapping is a hard failure, never clamped.

use std::collections::BTreeMap;

use crate::logic::classes::{self, STRESS_CLASSES};
use crate::logic::features::FeatureRecord;
use crate::logic::response::{FailureKind, InferenceResult, Prediction};

/// Allowed drift of the probability sum from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistributionError {
    #[error("expected {expected} class probabilities, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("probability for class {index} is out of range: {value}")]
    OutOfRange { index: usize, value: f64 },

    #[error("probabilities sum to {0}, expected 1")]
    BadSum(f64),
}

/// One probability per mapped class, each in [0, 1], summing to 1
pub fn validate_distribution(distribution: &[f64]) -> Result<(), DistributionError> {
    let expected = classes::class_count();
    if distribution.len() != expected {
        return Err(DistributionError::WrongLength {
            expected,
            actual: distribution.len(),
        });
    }

    for (index, &value) in distribution.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(DistributionError::OutOfRange { index, value });
        }
    }

    let sum: f64 = distribution.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(DistributionError::BadSum(sum));
    }

    Ok(())
}

/// Build the domain result for a scored record
pub fn translate(class_index: usize, distribution: &[f64], record: &FeatureRecord) -> InferenceResult {
    let Some(class) = classes::lookup(class_index) else {
        tracing::error!("Model predicted invalid class: {}", class_index);
        return InferenceResult::failure(
            FailureKind::UnrecognizedClass,
            format!("unrecognized class index {}", class_index),
        )
        .with_features(record);
    };

    if let Err(e) = validate_distribution(distribution) {
        tracing::error!("Model returned an invalid distribution: {}", e);
        return InferenceResult::failure(
            FailureKind::Unexpected,
            format!("invalid probability distribution: {}", e),
        )
        .with_features(record);
    }

    let probabilities: BTreeMap<String, f64> = STRESS_CLASSES
        .iter()
        .map(|c| (c.state.to_string(), distribution[c.index]))
        .collect();

    let prediction = Prediction {
        stress_state: class.state.to_string(),
        stress_level: class.level.to_string(),
        description: class.description.to_string(),
        severity: class.severity,
        confidence: distribution[class_index],
        probabilities,
    };

    InferenceResult::success(class_index, prediction, record)
}
