use crate::error::{ArtifactLoadError, InferenceError};
use crate::model::artifact::ParsedArtifact;
use crate::model::onnx::OnnxArtifact;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

// Initialize the global environment for ORT (only needed once)
pub fn init_ort() -> Result<(), InferenceError> {
    ort::init().with_name("churnserve").commit()?;
    Ok(())
}

/// Loads the churn model artifact from disk and creates its inference session.
///
/// # Arguments
/// * `artifact_path` - Path to the artifact file
/// * `intra_threads` - ONNX Runtime threads used within a single operator
pub fn load_artifact(
    artifact_path: impl AsRef<Path>,
    intra_threads: usize,
) -> Result<OnnxArtifact, ArtifactLoadError> {
    let path = artifact_path.as_ref();
    let parsed = read_artifact(path)?;

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_memory(&parsed.graph)?;

    info!(
        path = %path.display(),
        model_version = %parsed.descriptor.model_version,
        features = parsed.descriptor.features.len(),
        encoded_width = parsed.descriptor.encoded_width(),
        "loaded model artifact"
    );
    for (i, input) in session.inputs.iter().enumerate() {
        info!(index = i, name = %input.name, input_type = ?input.input_type, "classifier input");
    }

    OnnxArtifact::new(parsed, session)
}

/// Reads and parses the artifact file without touching ONNX Runtime.
pub fn read_artifact(path: &Path) -> Result<ParsedArtifact, ArtifactLoadError> {
    if !path.exists() {
        return Err(ArtifactLoadError::NotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ParsedArtifact::from_slice(&bytes)
}
