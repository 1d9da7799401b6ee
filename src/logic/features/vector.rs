//! Feature Vector - Core data structure for ML input
//!
//! Uses the centralized layout from `layout.rs`: position `i` always holds
//! the feature named `FEATURE_ORDER[i]`.

use serde::{Deserialize, Serialize};

use super::layout::{FEATURE_COUNT, FEATURE_ORDER};
use super::record::{FeatureError, FeatureRecord};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Ordered model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature values in order defined by FEATURE_ORDER
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values already in layout order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).and_then(|i| self.get(i))
    }

    /// Values as f32, for runtimes that take single precision tensors
    pub fn to_f32(&self) -> [f32; FEATURE_COUNT] {
        self.values.map(|v| v as f32)
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "values": self.values,
            "named_values": FEATURE_ORDER.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// VECTORIZER
// ============================================================================

/// Read a record in layout order.
///
/// Fails with [`FeatureError::MissingFeature`] naming the first layout
/// feature the record does not hold.
pub fn vectorize(record: &FeatureRecord) -> Result<FeatureVector, FeatureError> {
    let mut values = [0.0f64; FEATURE_COUNT];

    for (slot, name) in values.iter_mut().zip(FEATURE_ORDER) {
        *slot = record
            .get(name)
            .ok_or_else(|| FeatureError::MissingFeature(name.to_string()))?;
    }

    Ok(FeatureVector::from_values(values))
}
