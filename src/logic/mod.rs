//! Core inference logic
//!
//! Everything here is synchronous and transport-agnostic; the HTTP layer
//! only calls [`pipeline::InferencePipeline`].

pub mod features;
pub mod model;
pub mod classes;
pub mod classifier;
pub mod translate;
pub mod response;
pub mod pipeline;

pub use pipeline::InferencePipeline;
pub use response::{FailureKind, InferenceResult};
