//! The model artifact: fitted preprocessing plus classifier, loaded once.

pub mod artifact;
pub mod encoder;
pub mod loader;
pub mod onnx;

pub use artifact::{ArtifactDescriptor, FeatureRow, FeatureSpec, ModelArtifact, FORMAT_VERSION};
pub use loader::{init_ort, load_artifact};
pub use onnx::OnnxArtifact;
