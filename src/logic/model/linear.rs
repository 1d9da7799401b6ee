//! Linear Model - persisted logistic regression
//!
//! File format (JSON):
//!
//! ```json
//! {
//!   "name": "pico-stress-v3",
//!   "coefficients": [[0.12, -0.4, ...24 values...]],
//!   "intercepts": [-0.7],
//!   "layout_hash": 1234567890
//! }
//! ```
//!
//! One coefficient row is a binary model scored with the logistic function
//! (probability of class 1). Two or more rows are a multinomial model scored
//! with softmax, one row per class index.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::inference::{sigmoid, softmax, ClassifierModel, InferenceError};
use crate::logic::features::{layout::validate_layout_hash, FeatureVector, FEATURE_COUNT};

/// On-disk parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelParams {
    #[serde(default)]
    pub name: Option<String>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub layout_hash: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    name: String,
    weights: Vec<[f64; FEATURE_COUNT]>,
    intercepts: Vec<f64>,
}

impl LinearModel {
    /// Load and validate a model file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| InferenceError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let params: LinearModelParams =
            serde_json::from_str(&raw).map_err(|source| InferenceError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let name = params
            .name
            .clone()
            .unwrap_or_else(|| path.display().to_string());

        Self::from_params(name, params)
    }

    pub fn from_params(name: impl Into<String>, params: LinearModelParams) -> Result<Self, InferenceError> {
        if let Some(hash) = params.layout_hash {
            validate_layout_hash(hash)?;
        }

        if params.coefficients.is_empty() {
            return Err(InferenceError::InvalidParameters(
                "at least one coefficient row is required".to_string(),
            ));
        }

        if params.intercepts.len() != params.coefficients.len() {
            return Err(InferenceError::InvalidParameters(format!(
                "{} coefficient rows but {} intercepts",
                params.coefficients.len(),
                params.intercepts.len()
            )));
        }

        let mut weights = Vec::with_capacity(params.coefficients.len());
        for (row_index, row) in params.coefficients.into_iter().enumerate() {
            let len = row.len();
            let row: [f64; FEATURE_COUNT] = row.try_into().map_err(|_| {
                InferenceError::InvalidParameters(format!(
                    "coefficient row {} has {} values, expected {}",
                    row_index, len, FEATURE_COUNT
                ))
            })?;

            if row.iter().any(|w| !w.is_finite()) {
                return Err(InferenceError::InvalidParameters(format!(
                    "coefficient row {} contains a non-finite value",
                    row_index
                )));
            }
            weights.push(row);
        }

        if params.intercepts.iter().any(|b| !b.is_finite()) {
            return Err(InferenceError::InvalidParameters(
                "intercepts contain a non-finite value".to_string(),
            ));
        }

        Ok(Self {
            name: name.into(),
            weights,
            intercepts: params.intercepts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of classes the model distinguishes
    pub fn num_classes(&self) -> usize {
        if self.weights.len() == 1 { 2 } else { self.weights.len() }
    }

    fn decision_function(&self, input: &FeatureVector) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, bias)| {
                row.iter()
                    .zip(input.as_slice())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + bias
            })
            .collect()
    }
}

impl ClassifierModel for LinearModel {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn class_probabilities(&self, input: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        let logits = self.decision_function(input);

        if logits.iter().any(|l| !l.is_finite()) {
            return Err(InferenceError::Runtime(
                "decision function produced a non-finite value".to_string(),
            ));
        }

        let distribution = match logits.as_slice() {
            [single] => {
                let positive = sigmoid(*single);
                vec![1.0 - positive, positive]
            }
            many => softmax(many),
        };

        Ok(distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout_hash;
    use std::io::Write;

    fn binary_params(weight_on_hr_mean: f64, intercept: f64) -> LinearModelParams {
        let mut row = vec![0.0; FEATURE_COUNT];
        row[19] = weight_on_hr_mean;
        LinearModelParams {
            name: Some("test".to_string()),
            coefficients: vec![row],
            intercepts: vec![intercept],
            layout_hash: Some(layout_hash()),
        }
    }

    fn vector_with_hr_mean(hr: f64) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        values[19] = hr;
        FeatureVector::from_values(values)
    }

    #[test]
    fn test_binary_model_uses_logistic() {
        let model = LinearModel::from_params("hr", binary_params(0.1, -8.0)).unwrap();
        assert_eq!(model.num_classes(), 2);

        let calm = model.class_probabilities(&vector_with_hr_mean(60.0)).unwrap();
        assert!(calm[0] > calm[1]);
        assert_eq!(model.score(&vector_with_hr_mean(60.0)).unwrap(), 0);

        let stressed = model.class_probabilities(&vector_with_hr_mean(110.0)).unwrap();
        assert!(stressed[1] > 0.9);
        assert!((stressed.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_multinomial_model_uses_softmax() {
        let params = LinearModelParams {
            name: None,
            coefficients: vec![vec![0.0; FEATURE_COUNT]; 3],
            intercepts: vec![0.0, 1.0, 2.0],
            layout_hash: None,
        };
        let model = LinearModel::from_params("three", params).unwrap();
        let p = model.class_probabilities(&vector_with_hr_mean(0.0)).unwrap();

        assert_eq!(p.len(), 3);
        assert_eq!(model.score(&vector_with_hr_mean(0.0)).unwrap(), 2);
    }

    #[test]
    fn test_rejects_wrong_row_length() {
        let params = LinearModelParams {
            name: None,
            coefficients: vec![vec![0.0; 10]],
            intercepts: vec![0.0],
            layout_hash: None,
        };
        let err = LinearModel::from_params("short", params).unwrap_err();
        assert!(err.to_string().contains("expected 24"));
    }

    #[test]
    fn test_rejects_intercept_mismatch() {
        let mut params = binary_params(1.0, 0.0);
        params.intercepts.push(1.0);
        assert!(matches!(
            LinearModel::from_params("bad", params),
            Err(InferenceError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_rejects_layout_mismatch() {
        let mut params = binary_params(1.0, 0.0);
        params.layout_hash = Some(layout_hash().wrapping_add(7));
        assert!(matches!(
            LinearModel::from_params("stale", params),
            Err(InferenceError::LayoutMismatch(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&binary_params(0.05, -4.0)).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let model = LinearModel::load(file.path()).unwrap();
        assert_eq!(model.name(), "test");
        assert_eq!(model.kind(), "linear");
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95\x00binary model blob").unwrap();

        assert!(matches!(
            LinearModel::load(file.path()),
            Err(InferenceError::Io { .. }) | Err(InferenceError::Parse { .. })
        ));
    }
}
