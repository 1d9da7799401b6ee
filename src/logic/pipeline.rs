//! Inference Pipeline
//!
//! record → vectorize → (scale) → classify → translate → envelope.
//! Every path ends in an [`InferenceResult`]; a panic inside a model is
//! caught here and reported like any other internal fault.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::logic::classifier::classify;
use crate::logic::features::{vectorize, FeatureRecord};
use crate::logic::model::ResourceProvider;
use crate::logic::response::{FailureKind, InferenceResult};
use crate::logic::translate::translate;

pub const RESOURCES_NOT_LOADED: &str = "Model or scaler is not loaded on the server.";
pub const PREDICTION_FAILED: &str = "Prediction failed";

pub struct InferencePipeline {
    provider: Arc<ResourceProvider>,
}

impl InferencePipeline {
    pub fn new(provider: Arc<ResourceProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &ResourceProvider {
        &self.provider
    }

    /// Run on a raw JSON request body
    pub fn predict_json(&self, body: &Value) -> InferenceResult {
        match FeatureRecord::from_json(body) {
            Ok(record) => self.predict(&record),
            Err(e) => {
                tracing::warn!("Rejected feature payload: {}", e);
                InferenceResult::failure(FailureKind::Validation, e.to_string())
            }
        }
    }

    /// Run on a parsed record
    pub fn predict(&self, record: &FeatureRecord) -> InferenceResult {
        let vector = match vectorize(record) {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!("{}", e);
                return InferenceResult::failure(FailureKind::Validation, e.to_string())
                    .with_features(record);
            }
        };
        tracing::debug!("Feature vector: {}", vector.to_log_entry());

        let resources = match self.provider.get_resources() {
            Ok(resources) => resources,
            Err(e) => {
                tracing::error!("Prediction attempt failed: {}", e);
                return InferenceResult::failure(FailureKind::ResourceUnavailable, RESOURCES_NOT_LOADED)
                    .with_details(e.to_string())
                    .with_features(record);
            }
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            classify(&vector, resources.model.as_ref(), resources.scaler.as_deref())
        }));

        let classification = match outcome {
            Ok(Ok(classification)) => classification,
            Ok(Err(e)) => {
                tracing::error!("Prediction failed: {}", e);
                return InferenceResult::failure(FailureKind::Unexpected, PREDICTION_FAILED)
                    .with_details(e.to_string())
                    .with_features(record);
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!("Prediction panicked: {}", message);
                return InferenceResult::failure(FailureKind::Unexpected, PREDICTION_FAILED)
                    .with_details(message)
                    .with_features(record);
            }
        };

        let result = translate(
            classification.class_index,
            &classification.distribution,
            record,
        );

        if let Some(prediction) = result.prediction() {
            tracing::info!(
                "Prediction successful: {} (conf: {:.2})",
                prediction.stress_state,
                prediction.confidence
            );
        }

        result
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "model panicked".to_string()
    }
}
