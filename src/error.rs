use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::weather::WeatherError;

/// Every way a prediction request can fail.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Caller-side problems with the request payload.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Request body must be valid JSON")]
    InvalidBody,
    #[error("Missing required fields: {}", .missing.join(", "))]
    MissingFields {
        missing: Vec<String>,
        required: Vec<String>,
    },
    #[error("field '{field}' must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
}

/// Failures of something the request depends on but does not control.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("model '{model}' unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },
    #[error(transparent)]
    Weather(#[from] WeatherError),
}

/// Problems with a model artifact's shape or with a vector handed to it.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model artifact: {0}")]
    Invalid(String),
    #[error("feature length mismatch: got {got}, expected {expected}")]
    FeatureLength { got: usize, expected: usize },
    #[error("feature column {column} is not a finite number")]
    NonFinite { column: usize },
    #[error("model does not produce {0}")]
    WrongOutput(&'static str),
}

impl From<ModelError> for PredictError {
    fn from(e: ModelError) -> Self {
        PredictError::Inference(e.to_string())
    }
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::Validation(_) => StatusCode::BAD_REQUEST,
            PredictError::Dependency(_) => StatusCode::BAD_GATEWAY,
            PredictError::Inference(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> Value {
        let mut body = json!({ "success": false, "error": self.to_string() });
        if let PredictError::Validation(ValidationError::MissingFields { missing, required }) = self {
            body["missing_fields"] = json!(missing);
            body["required_fields"] = json!(required);
        }
        body
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        match status {
            StatusCode::BAD_GATEWAY => tracing::warn!("prediction dependency failed: {}", self),
            _ => tracing::debug!("prediction rejected: {}", self),
        }
        (status, Json(self.body())).into_response()
    }
}

/// Bare `{"error": ...}` 502, the shape the weather passthrough answers with.
impl IntoResponse for DependencyError {
    fn into_response(self) -> Response {
        tracing::warn!("dependency failed: {}", self);
        (StatusCode::BAD_GATEWAY, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
