//! Shared fixtures: request payloads, a stub artifact that counts its calls and
//! small ONNX classifier graphs.

use serde_json::{json, Value};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

use crate::error::{InferenceContractError, InferenceError};
use crate::model::{ArtifactDescriptor, FeatureRow, FeatureSpec, ModelArtifact, FORMAT_VERSION};
use crate::schema::{FeatureValue, FieldKind, FIELDS};

/// Descriptor covering every schema field with its full domain.
pub fn full_descriptor() -> ArtifactDescriptor {
    let features = FIELDS
        .iter()
        .map(|field| match field.kind {
            FieldKind::Categorical(domain) => FeatureSpec::Categorical {
                name: field.name.to_string(),
                categories: domain.iter().map(|d| d.to_string()).collect(),
            },
            _ => FeatureSpec::Numeric {
                name: field.name.to_string(),
                mean: 0.0,
                scale: 1.0,
            },
        })
        .collect();

    ArtifactDescriptor {
        format_version: FORMAT_VERSION,
        model_version: "stub".to_string(),
        features,
    }
}

/// New customer on a month-to-month fiber plan with no add-ons.
pub fn high_risk_payload() -> Value {
    json!({
        "gender": "Female",
        "SeniorCitizen": 0,
        "Partner": "No",
        "Dependents": "No",
        "tenure": 1,
        "PhoneService": "Yes",
        "MultipleLines": "No",
        "InternetService": "Fiber optic",
        "OnlineSecurity": "No",
        "OnlineBackup": "No",
        "DeviceProtection": "No",
        "TechSupport": "No",
        "StreamingTV": "No",
        "StreamingMovies": "No",
        "Contract": "Month-to-month",
        "PaperlessBilling": "Yes",
        "PaymentMethod": "Electronic check",
        "MonthlyCharges": 105.5,
        "TotalCharges": 105.5
    })
}

/// Five-year customer on a two-year contract with most add-ons.
pub fn low_risk_payload() -> Value {
    json!({
        "gender": "Male",
        "SeniorCitizen": 0,
        "Partner": "Yes",
        "Dependents": "Yes",
        "tenure": 60,
        "PhoneService": "Yes",
        "MultipleLines": "Yes",
        "InternetService": "DSL",
        "OnlineSecurity": "Yes",
        "OnlineBackup": "Yes",
        "DeviceProtection": "Yes",
        "TechSupport": "Yes",
        "StreamingTV": "No",
        "StreamingMovies": "No",
        "Contract": "Two year",
        "PaperlessBilling": "No",
        "PaymentMethod": "Bank transfer (automatic)",
        "MonthlyCharges": 25.0,
        "TotalCharges": 1500.0
    })
}

enum Behaviour {
    Constant(f64),
    Failing(InferenceContractError),
    Risk,
}

pub struct StubArtifact {
    descriptor: ArtifactDescriptor,
    behaviour: Behaviour,
    calls: AtomicUsize,
}

impl StubArtifact {
    fn build(descriptor: ArtifactDescriptor, behaviour: Behaviour) -> Self {
        Self {
            descriptor,
            behaviour,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn constant(probability: f64) -> Self {
        Self::build(full_descriptor(), Behaviour::Constant(probability))
    }

    pub fn with_descriptor(descriptor: ArtifactDescriptor, probability: f64) -> Self {
        Self::build(descriptor, Behaviour::Constant(probability))
    }

    pub fn failing(error: InferenceContractError) -> Self {
        Self::build(full_descriptor(), Behaviour::Failing(error))
    }

    /// Logistic score over contract, internet service, tenure, charges and add-ons.
    pub fn risk_model() -> Self {
        Self::build(full_descriptor(), Behaviour::Risk)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn number(row: &FeatureRow, name: &str) -> f64 {
    match row.get(name) {
        Some(FeatureValue::Number(x)) => x,
        _ => 0.0,
    }
}

fn is(row: &FeatureRow, name: &str, category: &str) -> bool {
    matches!(row.get(name), Some(FeatureValue::Category(c)) if c == category)
}

fn risk_score(row: &FeatureRow) -> f64 {
    let mut logit = -1.0;
    if is(row, "Contract", "Month-to-month") {
        logit += 1.5;
    }
    if is(row, "Contract", "Two year") {
        logit -= 1.5;
    }
    if is(row, "InternetService", "Fiber optic") {
        logit += 0.8;
    }
    logit -= 0.03 * number(row, "tenure");
    logit += 0.02 * (number(row, "MonthlyCharges") - 65.0);
    for add_on in ["OnlineSecurity", "OnlineBackup", "DeviceProtection", "TechSupport"] {
        if is(row, add_on, "Yes") {
            logit -= 0.3;
        }
    }
    1.0 / (1.0 + (-logit).exp())
}

impl ModelArtifact for StubArtifact {
    fn descriptor(&self) -> &ArtifactDescriptor {
        &self.descriptor
    }

    fn score(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            Behaviour::Constant(p) => Ok(*p),
            Behaviour::Failing(e) => Err(e.clone().into()),
            Behaviour::Risk => Ok(risk_score(row)),
        }
    }
}

/// Opset 11 graph over `features: [batch, width]`. It sums each row into `s` and
/// emits `label` (argmax), `probabilities = softmax([0, s])` and `logits = [0, s]`.
pub const SUM_CLASSIFIER_ONNX: &str = concat!(
    "CAYSEGNodXJuc2VydmUtdGVzdHM6vAMKPwoIZmVhdHVyZXMSBXNjb3JlGgNzdW0iCVJlZHVj",
    "ZVN1bSoLCgRheGVzoAEHQAEqDwoIa2VlcGRpbXOgAQIYAQofCgVzY29yZQoFc2NvcmUSBHpl",
    "cm8aBHplcm8iA1N1YgoyCgR6ZXJvCgVzY29yZRIGbG9naXRzGgZjb25jYXQiBkNvbmNhdCoL",
    "CgRheGlzoAECGAEKNgoGbG9naXRzEg1wcm9iYWJpbGl0aWVzGgdzb2Z0bWF4IgdTb2Z0bWF4",
    "KgsKBGF4aXOgAQIYAQpECg1wcm9iYWJpbGl0aWVzEgVsYWJlbBoGYXJnbWF4IgZBcmdNYXgq",
    "CwoEYXhpc6ABAhgBKg8KCGtlZXBkaW1zoAECGAESDWNodXJuX2ZpeHR1cmVaKAoIZmVhdHVy",
    "ZXMSHAoaCAESFgoJCgcSBWJhdGNoCgkKBxIFd2lkdGhiIAoFbGFiZWwSFwoVCAcSEQoJCgcS",
    "BWJhdGNoCgQKAggBYigKDXByb2JhYmlsaXRpZXMSFwoVCAESEQoJCgcSBWJhdGNoCgQKAggC",
    "YiEKBmxvZ2l0cxIXChUIARIRCgkKBxIFYmF0Y2gKBAoCCAJCBAoAEAs=",
);

/// The same graph with a second `offset: [batch, 1]` input added to `s`.
pub const TWO_INPUT_CLASSIFIER_ONNX: &str = concat!(
    "CAYSEGNodXJuc2VydmUtdGVzdHM6iwQKPwoIZmVhdHVyZXMSBXNjb3JlGgNzdW0iCVJlZHVj",
    "ZVN1bSoLCgRheGVzoAEHQAEqDwoIa2VlcGRpbXOgAQIYAQokCgVzY29yZQoGb2Zmc2V0Egdz",
    "aGlmdGVkGgVzaGlmdCIDQWRkCiMKB3NoaWZ0ZWQKB3NoaWZ0ZWQSBHplcm8aBHplcm8iA1N1",
    "Ygo0CgR6ZXJvCgdzaGlmdGVkEgZsb2dpdHMaBmNvbmNhdCIGQ29uY2F0KgsKBGF4aXOgAQIY",
    "AQo2CgZsb2dpdHMSDXByb2JhYmlsaXRpZXMaB3NvZnRtYXgiB1NvZnRtYXgqCwoEYXhpc6AB",
    "AhgBCkQKDXByb2JhYmlsaXRpZXMSBWxhYmVsGgZhcmdtYXgiBkFyZ01heCoLCgRheGlzoAEC",
    "GAEqDwoIa2VlcGRpbXOgAQIYARINY2h1cm5fZml4dHVyZVooCghmZWF0dXJlcxIcChoIARIW",
    "CgkKBxIFYmF0Y2gKCQoHEgV3aWR0aFohCgZvZmZzZXQSFwoVCAESEQoJCgcSBWJhdGNoCgQK",
    "AggBYiAKBWxhYmVsEhcKFQgHEhEKCQoHEgViYXRjaAoECgIIAWIoCg1wcm9iYWJpbGl0aWVz",
    "EhcKFQgBEhEKCQoHEgViYXRjaAoECgIIAmIhCgZsb2dpdHMSFwoVCAESEQoJCgcSBWJhdGNo",
    "CgQKAggCQgQKABAL",
);

/// Writes an artifact file around `graph` with `tenure` (scaled by 1/100) and a
/// one-hot `Contract` as its features.
pub fn onnx_artifact_file(
    graph: &str,
    probability_output: usize,
    positive_class: usize,
) -> NamedTempFile {
    let artifact = json!({
        "format_version": FORMAT_VERSION,
        "model_version": "sum-fixture",
        "features": [
            {"name": "tenure", "kind": "numeric", "mean": 0.0, "scale": 100.0},
            {
                "name": "Contract",
                "kind": "categorical",
                "categories": ["Month-to-month", "One year", "Two year"]
            }
        ],
        "classifier": {
            "probability_output": probability_output,
            "positive_class": positive_class,
            "onnx": graph
        }
    });
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(artifact.to_string().as_bytes()).unwrap();
    file
}
