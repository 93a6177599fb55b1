use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ndarray::ShapeError;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single offending request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A request rejected by the feature schema. Carries every offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, " {} ({})", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The model artifact could not be brought up. Always fatal at startup.
#[derive(Error, Debug)]
pub enum ArtifactLoadError {
    #[error("Model artifact not found at path: {0}")]
    NotFound(String),

    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model artifact: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Unsupported artifact format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Invalid feature preprocessing: {0}")]
    InvalidFeatures(String),

    #[error("Embedded classifier graph is not valid base64: {0}")]
    GraphEncoding(#[from] base64::DecodeError),

    #[error("Classifier graph does not match the artifact contract: {0}")]
    GraphShape(String),

    #[error("ONNX Runtime error: {0}")]
    Session(#[from] ort::Error),
}

/// The record or feature row does not fit the artifact's feature space.
/// This is a deployment fault, never something the client can correct.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceContractError {
    #[error("artifact feature `{0}` is not part of the request schema")]
    UnknownFeature(String),

    #[error("feature `{0}` expected by the artifact is absent from the record")]
    MissingFeature(String),

    #[error("feature row has {got} values, artifact expects {expected}")]
    RowWidth { expected: usize, got: usize },

    #[error("feature at position {position} is `{got}`, artifact expects `{expected}`")]
    FeatureOrder {
        position: usize,
        expected: String,
        got: String,
    },

    #[error("feature `{name}` must be {expected}")]
    KindMismatch { name: String, expected: &'static str },

    #[error("category `{value}` of feature `{name}` was not seen when the artifact was fitted")]
    UnknownCategory { name: String, value: String },

    #[error("schema admits `{value}` for feature `{name}` but the artifact cannot encode it")]
    UncoveredCategory { name: String, value: String },

    #[error("classifier output does not match the artifact contract: {0}")]
    Output(String),

    #[error("classifier produced probability {0}, outside [0, 1]")]
    ProbabilityRange(f64),
}

/// Failure while scoring a single record.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error(transparent)]
    Contract(#[from] InferenceContractError),

    #[error("ONNX Runtime error: {0}")]
    OrtError(#[from] ort::Error),

    #[error("Shape error: {0}")]
    ShapeError(#[from] ShapeError),

    #[error("Model session lock poisoned")]
    SessionPoisoned,
}

/// Invalid or unreadable service configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Request validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Model not loaded")]
    NotReady,

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServeError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "validation failed",
                    "fields": e.errors,
                }),
            ),
            ServeError::MalformedBody(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ServeError::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "model not loaded" }),
            ),
            ServeError::Inference(e) => {
                tracing::error!(error = %e, "inference failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
