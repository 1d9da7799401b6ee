//! Prediction handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::logic::response::{InferenceResult, LegacyPredictionView};
use crate::{AppError, AppResult, AppState};

/// Classify one set of sensor statistics
pub async fn predict_features(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<InferenceResult>> {
    let Json(body) = payload?;

    match state.pipeline.predict_json(&body) {
        InferenceResult::Failure(failure) => Err(AppError::Inference(failure)),
        success => Ok(Json(success)),
    }
}

/// Deprecated: old `/api/stats` response shape
pub async fn legacy_stats(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<LegacyPredictionView>> {
    let Json(body) = payload?;

    tracing::debug!("Deprecated /api/stats called");

    match state.pipeline.predict_json(&body) {
        InferenceResult::Failure(failure) => Err(AppError::Inference(failure)),
        success => Ok(Json(success.legacy_view())),
    }
}
