//! HTTP handlers

pub mod health;
pub mod features;
pub mod predict;
