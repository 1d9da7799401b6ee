//! Resource Provider - model and scaler lifecycle
//!
//! Loads the classifier and the feature scaler once and hands out shared
//! handles. The first caller runs the load; concurrent first callers block
//! on the same once-cell and all observe the same outcome. After that,
//! reads are lock-free. A failed load is cached too: requests keep being
//! rejected until [`ResourceProvider::invalidate`] or a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;

use super::fallback::FallbackModel;
use super::inference::{ClassifierModel, InferenceError};
use super::linear::LinearModel;
use super::scaler::{FeatureScaler, IdentityScaler, PersistedScaler};
use crate::logic::classes;

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResourceSettings {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    /// Skip the scaling stage entirely
    pub use_scaler: bool,
    /// Refuse the fallback model
    pub require_model: bool,
    /// Refuse the identity scaler
    pub require_scaler: bool,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("/app/pico_stress_model.json"),
            scaler_path: PathBuf::from("/app/pico_feature_scaler.json"),
            use_scaler: true,
            require_model: false,
            require_scaler: false,
        }
    }
}

// ============================================================================
// RESOURCES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("{resource} unavailable: {reason}")]
    Unavailable { resource: &'static str, reason: String },
}

/// Where a loaded resource came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ResourceOrigin {
    Persisted { path: String },
    Fallback,
    Injected,
}

impl ResourceOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ResourceOrigin::Fallback)
    }
}

/// Loaded model and optional scaler, immutable once built
pub struct Resources {
    pub model: Arc<dyn ClassifierModel>,
    pub scaler: Option<Arc<dyn FeatureScaler>>,
    pub model_origin: ResourceOrigin,
    pub scaler_origin: Option<ResourceOrigin>,
    pub loaded_at: DateTime<Utc>,
}

impl Resources {
    /// Resources built in code rather than loaded from disk
    pub fn injected(
        model: Arc<dyn ClassifierModel>,
        scaler: Option<Arc<dyn FeatureScaler>>,
    ) -> Self {
        let scaler_origin = scaler.as_ref().map(|_| ResourceOrigin::Injected);
        Self {
            model,
            scaler,
            model_origin: ResourceOrigin::Injected,
            scaler_origin,
            loaded_at: Utc::now(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.model_origin.is_fallback()
            || self.scaler_origin.as_ref().is_some_and(ResourceOrigin::is_fallback)
    }
}

/// Snapshot for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ResourceStatus {
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaler_kind: Option<&'static str>,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
}

// ============================================================================
// PROVIDER
// ============================================================================

pub struct ResourceProvider {
    settings: ResourceSettings,
    cell: OnceCell<Result<Arc<Resources>, ResourceError>>,
}

impl ResourceProvider {
    pub fn new(settings: ResourceSettings) -> Self {
        Self {
            settings,
            cell: OnceCell::new(),
        }
    }

    /// Provider that is already populated, no disk access
    pub fn with_resources(resources: Resources) -> Self {
        Self {
            settings: ResourceSettings::default(),
            cell: OnceCell::with_value(Ok(Arc::new(resources))),
        }
    }

    pub fn settings(&self) -> &ResourceSettings {
        &self.settings
    }

    /// Shared resources, loading them on first use
    pub fn get_resources(&self) -> Result<Arc<Resources>, ResourceError> {
        self.cell.get_or_init(|| load(&self.settings)).clone()
    }

    /// Current state without triggering a load
    pub fn status(&self) -> ResourceStatus {
        match self.cell.get() {
            Some(Ok(resources)) => ResourceStatus {
                model_loaded: true,
                scaler_loaded: resources.scaler.is_some(),
                model_kind: Some(resources.model.kind()),
                scaler_kind: resources.scaler.as_ref().map(|s| s.kind()),
                degraded: resources.is_degraded(),
                load_error: None,
                loaded_at: Some(resources.loaded_at),
            },
            Some(Err(e)) => ResourceStatus {
                model_loaded: false,
                scaler_loaded: false,
                model_kind: None,
                scaler_kind: None,
                degraded: true,
                load_error: Some(e.to_string()),
                loaded_at: None,
            },
            None => ResourceStatus {
                model_loaded: false,
                scaler_loaded: false,
                model_kind: None,
                scaler_kind: None,
                degraded: false,
                load_error: None,
                loaded_at: None,
            },
        }
    }

    /// Drop cached resources; the next request loads again
    pub fn invalidate(&mut self) {
        if self.cell.take().is_some() {
            tracing::info!("Model resources invalidated");
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

fn load(settings: &ResourceSettings) -> Result<Arc<Resources>, ResourceError> {
    let (model, model_origin) = load_model(settings)?;

    let (scaler, scaler_origin) = if settings.use_scaler {
        let (scaler, origin) = load_scaler(settings)?;
        (Some(scaler), Some(origin))
    } else {
        tracing::info!("Feature scaling disabled");
        (None, None)
    };

    Ok(Arc::new(Resources {
        model,
        scaler,
        model_origin,
        scaler_origin,
        loaded_at: Utc::now(),
    }))
}

fn load_model(
    settings: &ResourceSettings,
) -> Result<(Arc<dyn ClassifierModel>, ResourceOrigin), ResourceError> {
    let path = &settings.model_path;

    let reason = if path.exists() {
        match load_model_file(path) {
            Ok(model) => {
                tracing::info!("Loaded {} model from {}", model.kind(), path.display());
                return Ok((model, persisted(path)));
            }
            Err(e) => {
                tracing::error!("Failed to load model file {}: {}", path.display(), e);
                e.to_string()
            }
        }
    } else {
        format!("model file not found: {}", path.display())
    };

    if settings.require_model {
        return Err(ResourceError::Unavailable { resource: "model", reason });
    }

    tracing::warn!(
        "Model path not found or failed to load: {}. Using fallback model.",
        path.display()
    );
    let fallback: Arc<dyn ClassifierModel> = Arc::new(FallbackModel::new(classes::class_count()));
    Ok((fallback, ResourceOrigin::Fallback))
}

fn load_model_file(path: &Path) -> Result<Arc<dyn ClassifierModel>, InferenceError> {
    let is_onnx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("onnx"));

    if is_onnx {
        #[cfg(feature = "onnx")]
        {
            return Ok(Arc::new(super::onnx::OnnxModel::load(path)?));
        }
        #[cfg(not(feature = "onnx"))]
        {
            return Err(InferenceError::UnsupportedFormat(
                "ONNX support not compiled in (enable the `onnx` feature)".to_string(),
            ));
        }
    }

    Ok(Arc::new(LinearModel::load(path)?))
}

fn load_scaler(
    settings: &ResourceSettings,
) -> Result<(Arc<dyn FeatureScaler>, ResourceOrigin), ResourceError> {
    let path = &settings.scaler_path;

    let reason = if path.exists() {
        match PersistedScaler::load(path) {
            Ok(scaler) => {
                tracing::info!("Loaded {} scaler from {}", scaler.kind(), path.display());
                let scaler: Arc<dyn FeatureScaler> = Arc::new(scaler);
                return Ok((scaler, persisted(path)));
            }
            Err(e) => {
                tracing::error!("Failed to load scaler file {}: {}", path.display(), e);
                e.to_string()
            }
        }
    } else {
        format!("scaler file not found: {}", path.display())
    };

    if settings.require_scaler {
        return Err(ResourceError::Unavailable { resource: "scaler", reason });
    }

    tracing::warn!(
        "Scaler path not found or failed to load: {}. Using identity scaler.",
        path.display()
    );
    let identity: Arc<dyn FeatureScaler> = Arc::new(IdentityScaler);
    Ok((identity, ResourceOrigin::Fallback))
}

fn persisted(path: &Path) -> ResourceOrigin {
    ResourceOrigin::Persisted {
        path: path.display().to_string(),
    }
}
