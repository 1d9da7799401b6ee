//! Pico Stress Inference Service - entry point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stress_inference::{config::Config, create_router, logic::model::ResourceProvider, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stress_inference=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Pico Stress Inference Service v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::info!("Model: {}", config.model_path.display());
    tracing::info!("Scaler: {}", config.scaler_path.display());

    // Warm the model resources once; degraded mode is not fatal
    let provider = Arc::new(ResourceProvider::new(config.resource_settings()));
    match provider.get_resources() {
        Ok(resources) if resources.is_degraded() => {
            tracing::warn!("Service startup: running with fallback resources");
            if config.is_production() {
                tracing::warn!("Fallback predictions are random; set REQUIRE_MODEL=true to refuse them");
            }
        }
        Ok(_) => tracing::info!("Service startup: model and scaler loaded successfully"),
        Err(e) => tracing::error!("Service startup: {}; prediction requests will be rejected", e),
    }

    let state = AppState::new(config.clone(), provider);
    let app = create_router(state);

    // Start server
    let ip = config
        .host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("invalid HOST: {}", config.host))?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
