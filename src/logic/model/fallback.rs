//! Fallback Model - stand-in when no trained model can be loaded
//!
//! Output is random but well-formed: a probability per class drawn from a
//! flat Dirichlet distribution, so it always sums to 1. The service stays
//! up in degraded mode and downstream stages never special-case it.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::inference::{ClassifierModel, InferenceError};
use crate::logic::features::FeatureVector;

pub struct FallbackModel {
    classes: usize,
    rng: Mutex<StdRng>,
}

impl FallbackModel {
    pub fn new(classes: usize) -> Self {
        Self {
            classes,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence of outputs
    pub fn with_seed(classes: usize, seed: u64) -> Self {
        Self {
            classes,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn classes(&self) -> usize {
        self.classes
    }
}

impl ClassifierModel for FallbackModel {
    fn kind(&self) -> &'static str {
        "fallback"
    }

    fn class_probabilities(&self, _input: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        if self.classes == 0 {
            return Err(InferenceError::Runtime("fallback model has no classes".to_string()));
        }

        // Normalized unit exponentials are Dirichlet(1, ..., 1)
        let mut rng = self.rng.lock();
        let draws: Vec<f64> = (0..self.classes)
            .map(|_| -(1.0 - rng.gen::<f64>()).ln())
            .collect();
        drop(rng);

        let total: f64 = draws.iter().sum();
        let distribution: Vec<f64> = if total > 0.0 {
            draws.iter().map(|d| d / total).collect()
        } else {
            vec![1.0 / self.classes as f64; self.classes]
        };

        tracing::debug!("Fallback model returning probabilities {:?}", distribution);
        Ok(distribution)
    }
}
