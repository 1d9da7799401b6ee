//! Model Module - classifier and scaler resources
//!
//! Model variants behind one trait, feature scalers, and the provider that
//! owns their lifecycle.

pub mod inference;
pub mod linear;
pub mod fallback;
pub mod scaler;
pub mod provider;

#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use inference::{argmax, ClassifierModel, InferenceError};
pub use linear::{LinearModel, LinearModelParams};
pub use fallback::FallbackModel;
pub use scaler::{FeatureScaler, IdentityScaler, PersistedScaler, ScalerFile, ScalerParams};
pub use provider::{
    ResourceError, ResourceOrigin, ResourceProvider, ResourceSettings, ResourceStatus, Resources,
};
