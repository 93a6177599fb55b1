//! Inference: feature-row construction and the readiness slot around the artifact.

mod engine;
mod slot;

pub use engine::{verify_feature_space, InferenceEngine};
pub use slot::ModelSlot;
