use ort::session::Session;
use ort::value::Value;
use std::sync::Mutex;

use super::artifact::{ArtifactDescriptor, FeatureRow, ModelArtifact, ParsedArtifact};
use super::encoder::Encoder;
use crate::error::{ArtifactLoadError, InferenceContractError, InferenceError};

/// Fitted preprocessing plus an ONNX classifier, loaded from one artifact file.
pub struct OnnxArtifact {
    descriptor: ArtifactDescriptor,
    encoder: Encoder,
    // ONNX Runtime needs exclusive access to run a session. The lock covers the
    // run and copying the positive-class column out of its outputs.
    session: Mutex<Session>,
    input_name: String,
    probability_output: usize,
    positive_class: usize,
}

impl OnnxArtifact {
    pub(crate) fn new(parsed: ParsedArtifact, session: Session) -> Result<Self, ArtifactLoadError> {
        if session.inputs.len() != 1 {
            return Err(ArtifactLoadError::GraphShape(format!(
                "expected exactly one input tensor, graph declares {}",
                session.inputs.len()
            )));
        }
        if parsed.probability_output >= session.outputs.len() {
            return Err(ArtifactLoadError::GraphShape(format!(
                "probability output index {} but graph has {} outputs",
                parsed.probability_output,
                session.outputs.len()
            )));
        }

        let input_name = session.inputs[0].name.clone();
        let encoder = Encoder::new(parsed.descriptor.features.clone());

        Ok(Self {
            descriptor: parsed.descriptor,
            encoder,
            session: Mutex::new(session),
            input_name,
            probability_output: parsed.probability_output,
            positive_class: parsed.positive_class,
        })
    }
}

impl ModelArtifact for OnnxArtifact {
    fn descriptor(&self) -> &ArtifactDescriptor {
        &self.descriptor
    }

    fn score(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let features = self.encoder.encode(row)?;
        let shape = features.shape().to_vec();
        let (data, _) = features.into_raw_vec_and_offset();
        let input_value = Value::from_array((shape, data.into_boxed_slice()))?;

        let (dims, positive) = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| InferenceError::SessionPoisoned)?;
            let outputs = session.run(ort::inputs![self.input_name.as_str() => input_value])?;
            let (shape, probabilities) =
                outputs[self.probability_output].try_extract_tensor::<f32>()?;
            let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
            (dims, probabilities.get(self.positive_class).copied())
        };

        let positive = match positive {
            Some(value) if dims.first() == Some(&1) => value,
            _ => {
                return Err(InferenceContractError::Output(format!(
                    "probability tensor of shape {dims:?} has no column {}",
                    self.positive_class
                ))
                .into())
            }
        };

        let probability = f64::from(positive);
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(InferenceContractError::ProbabilityRange(probability).into());
        }
        Ok(probability)
    }
}
