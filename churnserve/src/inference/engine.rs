use metrics::histogram;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::error::{InferenceContractError, InferenceError};
use crate::model::{ArtifactDescriptor, FeatureRow, FeatureSpec, ModelArtifact};
use crate::schema::{self, CustomerRecord, FieldKind};

/// Bridges validated records to the artifact's scoring contract.
#[derive(Clone)]
pub struct InferenceEngine {
    artifact: Arc<dyn ModelArtifact>,
}

impl InferenceEngine {
    /// Wraps `artifact` after checking its feature space against the request schema.
    pub fn new(artifact: Arc<dyn ModelArtifact>) -> Result<Self, InferenceContractError> {
        verify_feature_space(artifact.descriptor())?;
        Ok(Self { artifact })
    }

    pub fn descriptor(&self) -> &ArtifactDescriptor {
        self.artifact.descriptor()
    }

    /// Builds exactly one row, in the order the artifact declares.
    pub fn build_row(&self, record: &CustomerRecord) -> Result<FeatureRow, InferenceContractError> {
        let features = &self.descriptor().features;
        let mut row = FeatureRow::with_capacity(features.len());
        for spec in features {
            let value = record
                .feature(spec.name())
                .ok_or_else(|| InferenceContractError::MissingFeature(spec.name().to_string()))?;
            row.push(spec.name(), value);
        }
        Ok(row)
    }

    pub fn infer(&self, record: &CustomerRecord) -> Result<f64, InferenceError> {
        let row = self.build_row(record)?;

        let start = Instant::now();
        let probability = self.artifact.score(&row)?;
        histogram!("churn_inference_seconds", start.elapsed().as_secs_f64());

        Ok(probability)
    }
}

/// Checks that every record the schema accepts can be encoded by the artifact.
pub fn verify_feature_space(descriptor: &ArtifactDescriptor) -> Result<(), InferenceContractError> {
    for spec in &descriptor.features {
        let field = schema::fields::field(spec.name())
            .ok_or_else(|| InferenceContractError::UnknownFeature(spec.name().to_string()))?;

        match (spec, field.kind) {
            (FeatureSpec::Categorical { name, categories }, FieldKind::Categorical(domain)) => {
                if let Some(missing) = domain.iter().find(|d| !categories.iter().any(|c| c == *d)) {
                    return Err(InferenceContractError::UncoveredCategory {
                        name: name.clone(),
                        value: missing.to_string(),
                    });
                }
            }
            (FeatureSpec::Categorical { name, .. }, _) => {
                return Err(InferenceContractError::KindMismatch {
                    name: name.clone(),
                    expected: "a category",
                });
            }
            (FeatureSpec::Numeric { name, .. }, kind) if !kind.is_numeric() => {
                return Err(InferenceContractError::KindMismatch {
                    name: name.clone(),
                    expected: "a number",
                });
            }
            (FeatureSpec::Numeric { .. }, _) => {}
        }
    }

    for field in schema::FIELDS {
        if !descriptor.features.iter().any(|f| f.name() == field.name) {
            warn!(field = field.name, "schema field is not consumed by the model artifact");
        }
    }
    Ok(())
}
