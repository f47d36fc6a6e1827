//! # API Error Types
//!
//! [`AppError`] implements `axum::response::IntoResponse` and maps domain
//! errors from the credence crates to HTTP status codes with a structured
//! JSON body. Internal messages are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use credence_registry::RevocationError;
use credence_vc::{DisclosureError, VcError};

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "CONFLICT").
    pub code: String,
    pub message: String,
    /// Additional context, present only for some client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// Well-formed request that violates a business rule (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid bearer token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict with current state (409). The optional value is returned as
    /// `details`.
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// 500. Message is logged but not returned to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };
        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let details = match self {
            Self::Conflict { details, .. } => details,
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<RevocationError> for AppError {
    fn from(err: RevocationError) -> Self {
        match &err {
            RevocationError::EmptyId => Self::Validation(err.to_string()),
            RevocationError::AlreadyRevoked(record) => Self::Conflict {
                message: err.to_string(),
                details: serde_json::to_value(record.as_ref()).ok(),
            },
        }
    }
}

impl From<VcError> for AppError {
    fn from(err: VcError) -> Self {
        match &err {
            VcError::MissingField(_)
            | VcError::MissingBaseType(_)
            | VcError::EmptyPresentation
            | VcError::NotDerived(_) => Self::Validation(err.to_string()),
            VcError::Json(_) => Self::BadRequest(err.to_string()),
            VcError::Canonicalization(_) | VcError::Suite(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<DisclosureError> for AppError {
    fn from(err: DisclosureError) -> Self {
        match &err {
            DisclosureError::Canonicalization(_) | DisclosureError::Json(_) => {
                Self::Internal(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}
