//! Stress Classes
//!
//! Static mapping from model class index to what it means for the subject.
//! Every index the model can produce needs an entry here; anything else is
//! rejected by the translator.

use serde::Serialize;

/// Domain descriptor for one model class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StressClass {
    pub index: usize,
    /// Display label, also the key in the probability map
    pub state: &'static str,
    pub level: &'static str,
    pub severity: u8,
    pub description: &'static str,
}

pub const STRESS_CLASSES: &[StressClass] = &[
    StressClass {
        index: 0,
        state: "Baseline",
        level: "Low",
        severity: 1,
        description: "Relaxed baseline state",
    },
    StressClass {
        index: 1,
        state: "Stress",
        level: "High",
        severity: 4,
        description: "Experiencing stress",
    },
];

/// Look up a class by model index
pub fn lookup(index: usize) -> Option<&'static StressClass> {
    STRESS_CLASSES.iter().find(|c| c.index == index)
}

/// Number of mapped classes
pub fn class_count() -> usize {
    STRESS_CLASSES.len()
}
