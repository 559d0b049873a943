//! Error types for the Quote Engine.
//!
//! Pricing itself never fails; errors come from validating caller
//! input before pricing and from the HTTP plumbing around it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Input rejected before it reaches the engine.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("contract length must be at least one month")]
    InvalidContractMonths,

    #[error("{item}: {field} must be a finite, non-negative number (got {value})")]
    InvalidAmount {
        item: String,
        field: &'static str,
        value: f64,
    },

    #[error("batch must contain at least one quote")]
    EmptyBatch,
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] QuoteError),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::InvalidInput(err) => err.to_string(),
            // Don't leak internal error details
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => tracing::error!(error = ?e, "Internal server error"),
            Self::InvalidInput(_) => tracing::warn!(error = %self, "Rejected quote request"),
        }

        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
