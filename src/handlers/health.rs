//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::logic::features::{layout_hash, FEATURE_COUNT, FEATURE_VERSION};
use crate::logic::model::ResourceStatus;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    #[serde(flatten)]
    resources: ResourceStatus,
    feature_layout: LayoutSummary,
    timestamp: i64,
}

#[derive(Serialize)]
pub struct LayoutSummary {
    version: u8,
    hash: u32,
    feature_count: usize,
}

/// Reports resource state without loading anything
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        resources: state.pipeline.provider().status(),
        feature_layout: LayoutSummary {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
        },
        timestamp: chrono::Utc::now().timestamp(),
    })
}
