//! Features Module - Feature Schema & Vectorizer
//!
//! Turns the caller's named sensor statistics into the ordered vector the
//! model was trained on.

pub mod layout;
pub mod record;
pub mod vector;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_ORDER, FEATURE_VERSION, LayoutInfo, layout_hash};
pub use record::{FeatureError, FeatureRecord};
pub use vector::{vectorize, FeatureVector};
