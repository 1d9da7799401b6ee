//! Feature Scaling
//!
//! Persisted scaler file (JSON), either
//! `{"kind": "standard", "mean": [...], "scale": [...]}` or
//! `{"kind": "min_max", "min": [...], "max": [...]}`, each array holding
//! one value per feature in layout order, plus an optional `layout_hash`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::inference::InferenceError;
use crate::logic::features::{layout::validate_layout_hash, FeatureVector, FEATURE_COUNT};

/// Trait cho feature scalers
pub trait FeatureScaler: Send + Sync {
    fn kind(&self) -> &'static str;
    fn transform(&self, input: &FeatureVector) -> FeatureVector;
}

// ============================================================================
// PERSISTED PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerParams {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    MinMax { min: Vec<f64>, max: Vec<f64> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerFile {
    #[serde(flatten)]
    pub params: ScalerParams,
    #[serde(default)]
    pub layout_hash: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
enum Scaling {
    Standard {
        mean: [f64; FEATURE_COUNT],
        scale: [f64; FEATURE_COUNT],
    },
    MinMax {
        min: [f64; FEATURE_COUNT],
        max: [f64; FEATURE_COUNT],
    },
}

/// Scaler loaded from disk
#[derive(Debug, Clone)]
pub struct PersistedScaler {
    scaling: Scaling,
}

impl PersistedScaler {
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| InferenceError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let file: ScalerFile = serde_json::from_str(&raw).map_err(|source| InferenceError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_file(file)
    }

    pub fn from_file(file: ScalerFile) -> Result<Self, InferenceError> {
        if let Some(hash) = file.layout_hash {
            validate_layout_hash(hash)?;
        }

        let scaling = match file.params {
            ScalerParams::Standard { mean, scale } => Scaling::Standard {
                mean: per_feature("mean", mean)?,
                scale: per_feature("scale", scale)?,
            },
            ScalerParams::MinMax { min, max } => Scaling::MinMax {
                min: per_feature("min", min)?,
                max: per_feature("max", max)?,
            },
        };

        Ok(Self { scaling })
    }
}

fn per_feature(field: &str, values: Vec<f64>) -> Result<[f64; FEATURE_COUNT], InferenceError> {
    let len = values.len();
    let array: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
        InferenceError::InvalidParameters(format!(
            "scaler {} has {} values, expected {}",
            field, len, FEATURE_COUNT
        ))
    })?;

    if array.iter().any(|v| !v.is_finite()) {
        return Err(InferenceError::InvalidParameters(format!(
            "scaler {} contains a non-finite value",
            field
        )));
    }
    Ok(array)
}

impl FeatureScaler for PersistedScaler {
    fn kind(&self) -> &'static str {
        match self.scaling {
            Scaling::Standard { .. } => "standard",
            Scaling::MinMax { .. } => "min_max",
        }
    }

    fn transform(&self, input: &FeatureVector) -> FeatureVector {
        let mut values = *input.as_array();

        match &self.scaling {
            Scaling::Standard { mean, scale } => {
                for i in 0..FEATURE_COUNT {
                    // Zero-variance features keep unit scale
                    let s = if scale[i] == 0.0 { 1.0 } else { scale[i] };
                    values[i] = (values[i] - mean[i]) / s;
                }
            }
            Scaling::MinMax { min, max } => {
                for i in 0..FEATURE_COUNT {
                    let range = (max[i] - min[i]).max(1e-8);
                    values[i] = ((values[i] - min[i]) / range).clamp(0.0, 1.0);
                }
            }
        }

        FeatureVector::from_values(values)
    }
}

// ============================================================================
// IDENTITY (fallback)
// ============================================================================

/// Passes features through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityScaler;

impl FeatureScaler for IdentityScaler {
    fn kind(&self) -> &'static str {
        "identity"
    }

    fn transform(&self, input: &FeatureVector) -> FeatureVector {
        tracing::debug!("Identity scaler passing features through without scaling");
        *input
    }
}
