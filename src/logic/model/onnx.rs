//! ONNX Model - ONNX Runtime Integration
//!
//! Loads a classifier exported with a probability output (for sklearn
//! pipelines: `skl2onnx` with `zipmap=False`). The output whose name
//! contains "prob" is used; otherwise the last output.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::inference::{ClassifierModel, InferenceError};
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

pub struct OnnxModel {
    // Session::run needs &mut
    session: Mutex<Session>,
    probability_output: String,
    path: String,
}

impl OnnxModel {
    /// Load ONNX model từ file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        tracing::info!("Loading ONNX model from: {}", path.display());

        let session = Session::builder()
            .map_err(|e| InferenceError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| InferenceError::Runtime(format!("Failed to load model: {}", e)))?;

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.to_lowercase().contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::InvalidParameters("model defines no outputs".to_string()))?;

        tracing::info!("ONNX model loaded, reading output '{}'", probability_output);

        Ok(Self {
            session: Mutex::new(session),
            probability_output,
            path: path.display().to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl ClassifierModel for OnnxModel {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn class_probabilities(&self, input: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input.to_f32().to_vec())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.probability_output)
            .ok_or_else(|| InferenceError::Runtime("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;

        let distribution = match data {
            [] => return Err(InferenceError::Runtime("empty probability output".to_string())),
            // Single sigmoid output: probability of class 1
            [positive] => vec![1.0 - *positive as f64, *positive as f64],
            many => many.iter().map(|&p| p as f64).collect(),
        };

        Ok(distribution)
    }
}
