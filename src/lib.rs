//! Pico Stress Inference Service
//!
//! Classifies a subject's physiological state (baseline vs stress) from
//! pre-computed wearable sensor statistics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  STRESS INFERENCE SERVICE                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  HTTP (Axum) ──▶ FeatureRecord ──▶ vectorize ──▶ scaler     │
//! │                                                   │         │
//! │  envelope ◀── translate ◀── classify ◀────────────┘         │
//! │                                ▲                            │
//! │                     ┌──────────┴──────────┐                 │
//! │                     │  ResourceProvider   │                 │
//! │                     │ (model + scaler,    │                 │
//! │                     │  loaded once)       │                 │
//! │                     └─────────────────────┘                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};
use logic::model::ResourceProvider;
use logic::InferencePipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<InferencePipeline>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config, provider: Arc<ResourceProvider>) -> Self {
        Self {
            pipeline: Arc::new(InferencePipeline::new(provider)),
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::check))
        .route("/api/v1/features", get(handlers::features::layout))
        .route("/api/v1/predict_features", post(handlers::predict::predict_features))
        // Deprecated
        .route("/api/stats", post(handlers::predict::legacy_stats))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
