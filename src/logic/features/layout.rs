//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the model input schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The order below must match the order the stress model was trained with.
//! Persisted models and scalers may carry the layout hash they were fitted
//! against; the loader rejects them when it differs from [`layout_hash`].

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 2;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Total number of features
pub const FEATURE_COUNT: usize = 24;

/// Feature names in exact order they appear in the vector
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    // === Accelerometer (0-11) ===
    "X_std", "Y_std", "Z_std",
    "X_min", "Y_min", "Z_min",
    "X_max", "Y_max", "Z_max",
    "X_mean", "Y_mean", "Z_mean",

    // === Electrodermal activity (12-15) ===
    "EDA_std", "EDA_min", "EDA_max", "EDA_mean",

    // === Heart rate, BPM (16-19) ===
    "HR_std", "HR_min", "HR_max", "HR_mean",

    // === Skin temperature (20-23) ===
    "TEMP_std", "TEMP_min", "TEMP_max", "TEMP_mean",
];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_ORDER {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Layout hash of the current schema
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout information exposed on the status endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Persisted resource was fitted against a different feature layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("feature layout mismatch: expected hash {expected:08x}, got {actual:08x}")]
pub struct LayoutMismatchError {
    pub expected: u32,
    pub actual: u32,
}

/// Validate a declared layout hash against the current layout
pub fn validate_layout_hash(declared: u32) -> Result<(), LayoutMismatchError> {
    let current = layout_hash();
    if declared != current {
        return Err(LayoutMismatchError {
            expected: current,
            actual: declared,
        });
    }
    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_ORDER.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_ORDER.get(index).copied()
}
