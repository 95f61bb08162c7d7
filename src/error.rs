//! Error taxonomy and the JSON envelope every failure is rendered into.
//!
//! All responses share `{ success, message, error? }`. Client-facing errors
//! carry a fixed message; storage and internal errors optionally attach the
//! underlying text under `error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication failed: No master key provided")]
    Unauthenticated,

    #[error("Authentication failed: Invalid master key")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("{message}: {detail}")]
    Storage {
        message: &'static str,
        detail: String,
    },

    #[error("Route not found")]
    NotFound,

    /// `detail` is only populated when the environment allows exposing it.
    #[error("Something went wrong!")]
    Internal { detail: Option<String> },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let (message, detail) = match self {
            AppError::Validation(msg) => (msg.clone(), None),
            AppError::Storage { message, detail } => (message.to_string(), Some(detail.clone())),
            AppError::Internal { detail } => (self.to_string(), detail.clone()),
            other => (other.to_string(), None),
        };
        ErrorBody {
            success: false,
            message,
            error: detail,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Storage { message, detail } = &self {
            error!(error = %detail, "{message}");
        }
        (self.status(), Json(self.body())).into_response()
    }
}
