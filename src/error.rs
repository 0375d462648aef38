use http::StatusCode;
use thiserror::Error;

use crate::types::RequestId;

#[derive(Error, Debug, Clone)]
pub enum FanoutError {
    #[error("Failed to distribute subtasks for request {request_id}: {reason}")]
    Dispatch {
        request_id: RequestId,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

pub type Result<T> = std::result::Result<T, FanoutError>;

impl From<prometheus::Error> for FanoutError {
    fn from(e: prometheus::Error) -> Self {
        FanoutError::Metrics(e.to_string())
    }
}

impl FanoutError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FanoutError::Dispatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            FanoutError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FanoutError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The request this error belongs to, when it happened inside a dispatch.
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            FanoutError::Dispatch { request_id, .. } => Some(request_id),
            _ => None,
        }
    }
}

// Axum IntoResponse implementation (feature-gated)
#[cfg(feature = "axum-support")]
use axum::response::{IntoResponse, Json, Response};
#[cfg(feature = "axum-support")]
use serde::Serialize;

#[cfg(feature = "axum-support")]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[cfg(feature = "axum-support")]
impl IntoResponse for FanoutError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match &self {
            // Dispatch faults are reported with a fixed message; the cause stays in the logs.
            FanoutError::Dispatch { request_id, .. } => ErrorResponse {
                error: "Failed to distribute subtasks".to_string(),
                request_id: Some(request_id.to_string()),
            },
            other => ErrorResponse {
                error: other.to_string(),
                request_id: None,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
