//! JSON response envelope and the relay's request-fatal errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forward::{BuildError, ForwardError};

/// The envelope returned on every webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error: Some(error.into()),
        }
    }
}

/// Failures that end a relay request with HTTP 500.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    BodyRead(String),

    #[error(transparent)]
    RequestBuild(#[from] BuildError),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl RelayError {
    /// Fixed summary placed in the envelope's `message` field.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::BodyRead(_) => "failed to read request body",
            Self::RequestBuild(_) => "failed to create new request",
            Self::Forward(_) => "failed to forward request",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(self.summary(), self.to_string())),
        )
            .into_response()
    }
}
