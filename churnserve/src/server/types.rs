use crate::decision::{round_probability, DecisionThreshold, Label, PredictionResult};
use crate::inference::ModelSlot;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

/// Shared Application State
#[derive(Clone)]
pub struct AppState {
    pub slot: ModelSlot,
    pub threshold: DecisionThreshold,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(slot: ModelSlot, threshold: DecisionThreshold) -> Self {
        Self {
            slot,
            threshold,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

// --- DTOs (Data Transfer Objects) ---

// Prediction
#[derive(Serialize, Debug, PartialEq)]
pub struct PredictResponse {
    /// Rounded to three decimals; the label was decided on the unrounded value.
    pub churn_probability: f64,
    pub churn_prediction: Label,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            churn_probability: round_probability(result.probability),
            churn_prediction: result.label,
        }
    }
}

// Health
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ready,
    Loading,
    Alive,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl HealthResponse {
    pub fn status(status: HealthStatus) -> Self {
        Self {
            status,
            model_version: None,
            threshold: None,
        }
    }
}
