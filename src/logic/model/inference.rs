//! Inference Engine - model abstraction
//!
//! Every model variant (persisted linear model, ONNX session, fallback)
//! implements [`ClassifierModel`], so the pipeline never special-cases
//! where the model came from.

use crate::logic::features::{FeatureVector, layout::LayoutMismatchError};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid model parameters: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("inference failed: {0}")]
    Runtime(String),
}

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// Trait cho classification models (linear, ONNX, fallback)
pub trait ClassifierModel: Send + Sync {
    /// Short identifier reported on the health endpoint
    fn kind(&self) -> &'static str;

    /// Probability per class, indexed by class index
    fn class_probabilities(&self, input: &FeatureVector) -> Result<Vec<f64>, InferenceError>;

    /// Most likely class index
    fn score(&self, input: &FeatureVector) -> Result<usize, InferenceError> {
        let distribution = self.class_probabilities(input)?;
        argmax(&distribution)
            .ok_or_else(|| InferenceError::Runtime("model returned no class probabilities".to_string()))
    }
}

/// Index of the largest value. Ties go to the lowest index; NaN never wins.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, current)) if !(value > current) => {}
            None if value.is_nan() => {}
            _ => best = Some((index, value)),
        }
    }

    best.map(|(index, _)| index).or(if values.is_empty() { None } else { Some(0) })
}

/// Logistic function
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Numerically stable softmax
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
