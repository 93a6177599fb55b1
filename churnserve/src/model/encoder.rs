use ndarray::Array2;

use super::artifact::{FeatureRow, FeatureSpec};
use crate::error::{InferenceContractError, InferenceError};
use crate::schema::FeatureValue;

/// Applies an artifact's fitted preprocessing to a single row.
#[derive(Debug, Clone)]
pub struct Encoder {
    features: Vec<FeatureSpec>,
    width: usize,
}

impl Encoder {
    pub fn new(features: Vec<FeatureSpec>) -> Self {
        let width = features.iter().map(FeatureSpec::width).sum();
        Self { features, width }
    }

    /// Encodes `row` into a `[1, width]` float tensor.
    pub fn encode(&self, row: &FeatureRow) -> Result<Array2<f32>, InferenceError> {
        if row.len() != self.features.len() {
            return Err(InferenceContractError::RowWidth {
                expected: self.features.len(),
                got: row.len(),
            }
            .into());
        }

        let mut data = Vec::with_capacity(self.width);
        for (position, (spec, (name, value))) in self.features.iter().zip(row.iter()).enumerate() {
            if spec.name() != name {
                return Err(InferenceContractError::FeatureOrder {
                    position,
                    expected: spec.name().to_string(),
                    got: name.to_string(),
                }
                .into());
            }

            match (spec, value) {
                (FeatureSpec::Categorical { categories, .. }, FeatureValue::Category(v)) => {
                    let hot = categories.iter().position(|c| c == v).ok_or_else(|| {
                        InferenceContractError::UnknownCategory {
                            name: name.to_string(),
                            value: v.to_string(),
                        }
                    })?;
                    data.extend((0..categories.len()).map(|i| if i == hot { 1.0 } else { 0.0 }));
                }
                (FeatureSpec::Numeric { mean, scale, .. }, FeatureValue::Number(x)) => {
                    data.push(((x - mean) / scale) as f32);
                }
                (FeatureSpec::Categorical { .. }, FeatureValue::Number(_)) => {
                    return Err(kind_mismatch(name, "a category"));
                }
                (FeatureSpec::Numeric { .. }, FeatureValue::Category(_)) => {
                    return Err(kind_mismatch(name, "a number"));
                }
            }
        }

        Ok(Array2::from_shape_vec((1, self.width), data)?)
    }
}

fn kind_mismatch(name: &str, expected: &'static str) -> InferenceError {
    InferenceContractError::KindMismatch {
        name: name.to_string(),
        expected,
    }
    .into()
}
