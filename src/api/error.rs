//! API error handling for consistent JSON error responses.

use crate::error::PipelineError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error type that converts to JSON responses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": true,
            "kind": self.kind,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<&PipelineError> for ApiError {
    fn from(err: &PipelineError) -> Self {
        let status = match err {
            PipelineError::CaptureBusy => StatusCode::CONFLICT,
            PipelineError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            PipelineError::UnsupportedPlatform { .. } => StatusCode::NOT_IMPLEMENTED,
            PipelineError::NoAudioCaptured { .. } | PipelineError::EmptyAudio { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PipelineError::ModelFailure { .. } => StatusCode::BAD_GATEWAY,
            PipelineError::LaunchFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.kind(), err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_status_mapping() {
        let busy = ApiError::from(&PipelineError::CaptureBusy);
        assert_eq!(busy.status, StatusCode::CONFLICT);
        assert_eq!(busy.kind, "capture_busy");

        let missing = ApiError::from(&PipelineError::FileNotFound {
            path: "/tmp/x.wav".into(),
        });
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let model = ApiError::from(&PipelineError::model_failure("remote-summary", "down"));
        assert_eq!(model.status, StatusCode::BAD_GATEWAY);
    }
}
