use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use std::collections::HashSet;

use crate::error::{ArtifactLoadError, InferenceError};
use crate::schema::FeatureValue;

/// Artifact format version this build understands.
pub const FORMAT_VERSION: u32 = 1;

/// Fitted preprocessing for one input feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// One-hot over the fitted categories, in order.
    Categorical {
        name: String,
        categories: Vec<String>,
    },
    /// Standardised as `(x - mean) / scale`.
    Numeric {
        name: String,
        #[serde(default)]
        mean: f64,
        #[serde(default = "unit_scale")]
        scale: f64,
    },
}

fn unit_scale() -> f64 {
    1.0
}

impl FeatureSpec {
    pub fn name(&self) -> &str {
        match self {
            FeatureSpec::Categorical { name, .. } | FeatureSpec::Numeric { name, .. } => name,
        }
    }

    /// Number of encoded columns this feature occupies.
    pub fn width(&self) -> usize {
        match self {
            FeatureSpec::Categorical { categories, .. } => categories.len(),
            FeatureSpec::Numeric { .. } => 1,
        }
    }
}

/// Identity and feature space of a loaded artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactDescriptor {
    pub format_version: u32,
    pub model_version: String,
    pub features: Vec<FeatureSpec>,
}

impl ArtifactDescriptor {
    pub fn encoded_width(&self) -> usize {
        self.features.iter().map(FeatureSpec::width).sum()
    }
}

/// One row of raw feature values, in the order the artifact declares.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRow {
    values: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.values.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

/// The narrow capability the serving path depends on.
///
/// Implementations are loaded once and shared read-only across requests.
pub trait ModelArtifact: Send + Sync {
    fn descriptor(&self) -> &ArtifactDescriptor;

    /// Calibrated probability of the churn class for a single row.
    fn score(&self, row: &FeatureRow) -> Result<f64, InferenceError>;
}

#[derive(Deserialize)]
struct ArtifactFile {
    format_version: u32,
    model_version: String,
    features: Vec<FeatureSpec>,
    classifier: ClassifierFile,
}

#[derive(Deserialize)]
struct ClassifierFile {
    #[serde(default = "default_probability_output")]
    probability_output: usize,
    #[serde(default = "default_positive_class")]
    positive_class: usize,
    onnx: String,
}

fn default_probability_output() -> usize {
    1
}

fn default_positive_class() -> usize {
    1
}

/// Everything read from the artifact file before ONNX Runtime is involved.
#[derive(Debug)]
pub struct ParsedArtifact {
    pub descriptor: ArtifactDescriptor,
    pub probability_output: usize,
    pub positive_class: usize,
    pub graph: Vec<u8>,
}

impl ParsedArtifact {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactLoadError> {
        let file: ArtifactFile = serde_json::from_slice(bytes)?;

        if file.format_version != FORMAT_VERSION {
            return Err(ArtifactLoadError::UnsupportedVersion {
                found: file.format_version,
                supported: FORMAT_VERSION,
            });
        }
        check_features(&file.features)?;

        let graph = general_purpose::STANDARD.decode(file.classifier.onnx.trim())?;
        if graph.is_empty() {
            return Err(ArtifactLoadError::GraphShape(
                "embedded classifier graph is empty".to_string(),
            ));
        }

        Ok(Self {
            descriptor: ArtifactDescriptor {
                format_version: file.format_version,
                model_version: file.model_version,
                features: file.features,
            },
            probability_output: file.classifier.probability_output,
            positive_class: file.classifier.positive_class,
            graph,
        })
    }
}

fn check_features(features: &[FeatureSpec]) -> Result<(), ArtifactLoadError> {
    let invalid = |message: String| Err(ArtifactLoadError::InvalidFeatures(message));

    if features.is_empty() {
        return invalid("artifact declares no features".to_string());
    }

    let mut seen = HashSet::new();
    for feature in features {
        if !seen.insert(feature.name()) {
            return invalid(format!("duplicate feature `{}`", feature.name()));
        }
        match feature {
            FeatureSpec::Categorical { name, categories } => {
                if categories.is_empty() {
                    return invalid(format!("feature `{name}` has no categories"));
                }
                let distinct: HashSet<_> = categories.iter().collect();
                if distinct.len() != categories.len() {
                    return invalid(format!("feature `{name}` repeats a category"));
                }
            }
            FeatureSpec::Numeric { name, mean, scale } => {
                if !mean.is_finite() {
                    return invalid(format!("feature `{name}` has a non-finite mean"));
                }
                if !scale.is_finite() || *scale == 0.0 {
                    return invalid(format!("feature `{name}` needs a finite non-zero scale"));
                }
            }
        }
    }
    Ok(())
}
