pub mod config;
pub mod decision;
pub mod error;
pub mod inference;
pub mod model;
pub mod schema;
pub mod server;
pub mod telemetry;

#[cfg(test)]
mod test_support;

// Re-export common types
pub use decision::{DecisionThreshold, Label, PredictionResult};
pub use error::{ArtifactLoadError, InferenceContractError, InferenceError, ServeError, ValidationError};
pub use schema::{validate, CustomerRecord};
