use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use metrics::{counter, increment_counter};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::decision::PredictionResult;
use crate::error::ServeError;
use crate::schema;
use crate::server::types::*;

/// Readiness: ready once the model artifact is installed.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match state.slot.get() {
        Some(engine) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: HealthStatus::Ready,
                model_version: Some(engine.descriptor().model_version.clone()),
                threshold: Some(state.threshold.value()),
            }),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::status(HealthStatus::Loading)),
        ),
    }
}

/// Liveness: the process is up and answering.
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse::status(HealthStatus::Alive))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, ServeError> {
    let Json(raw) = payload.map_err(|rejection| ServeError::MalformedBody(rejection.body_text()))?;

    // Fail fast before readiness; nothing is validated or scored.
    let engine = state.slot.get().ok_or(ServeError::NotReady)?;

    let record = schema::validate(&raw).map_err(|e| {
        increment_counter!("churn_validation_rejections_total");
        debug!(fields = ?e.fields().collect::<Vec<_>>(), "rejected prediction request");
        e
    })?;

    let probability = engine.infer(&record)?;
    let result = PredictionResult::new(probability, state.threshold);

    counter!("churn_predictions_total", 1, "label" => result.label.as_str());
    debug!(
        probability,
        label = result.label.as_u8(),
        "prediction served"
    );

    Ok(Json(PredictResponse::from(result)))
}

/// Prometheus text exposition; 404 when metrics are disabled.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(StatusCode::NOT_FOUND)
}
