//! Classifier Adapter
//!
//! Input: FeatureVector, model, optional scaler
//! Output: class index + full distribution
//!
//! The distribution is taken as the model returns it; the translator is the
//! stage that checks it against the class mapping.

use serde::Serialize;

use crate::logic::features::FeatureVector;
use crate::logic::model::{argmax, ClassifierModel, FeatureScaler, InferenceError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub class_index: usize,
    pub confidence: f64,
    pub distribution: Vec<f64>,
}

/// Scale (when a scaler is given), then score.
///
/// `class_index` is the argmax of the distribution with ties going to the
/// lowest index, and `confidence` is the probability at that index.
pub fn classify(
    vector: &FeatureVector,
    model: &dyn ClassifierModel,
    scaler: Option<&dyn FeatureScaler>,
) -> Result<Classification, InferenceError> {
    let scaled = match scaler {
        Some(scaler) => scaler.transform(vector),
        None => *vector,
    };

    let distribution = model.class_probabilities(&scaled)?;

    let class_index = argmax(&distribution).ok_or_else(|| {
        InferenceError::Runtime(format!("{} model returned no class probabilities", model.kind()))
    })?;
    let confidence = distribution[class_index];

    tracing::debug!(
        "Model {} scored class {} (p = {:.4})",
        model.kind(),
        class_index,
        confidence
    );

    Ok(Classification {
        class_index,
        confidence,
        distribution,
    })
}
