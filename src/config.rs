//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::logic::model::ResourceSettings;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Persisted model (JSON linear model, or .onnx with the `onnx` feature)
    pub model_path: PathBuf,

    /// Persisted feature scaler
    pub scaler_path: PathBuf,

    /// Apply the scaler before scoring
    pub use_scaler: bool,

    /// Refuse to serve with the fallback model
    pub require_model: bool,

    /// Refuse to serve with the identity scaler
    pub require_scaler: bool,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/app/pico_stress_model.json")),

            scaler_path: env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/app/pico_feature_scaler.json")),

            use_scaler: env_flag("USE_SCALER").unwrap_or(true),
            require_model: env_flag("REQUIRE_MODEL").unwrap_or(false),
            require_scaler: env_flag("REQUIRE_SCALER").unwrap_or(false),

            log_json: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Settings for the model resource provider
    pub fn resource_settings(&self) -> ResourceSettings {
        ResourceSettings {
            model_path: self.model_path.clone(),
            scaler_path: self.scaler_path.clone(),
            use_scaler: self.use_scaler,
            require_model: self.require_model,
            require_scaler: self.require_scaler,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let resources = ResourceSettings::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_path: resources.model_path,
            scaler_path: resources.scaler_path,
            use_scaler: resources.use_scaler,
            require_model: resources.require_model,
            require_scaler: resources.require_scaler,
            log_json: false,
            environment: "development".to_string(),
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
