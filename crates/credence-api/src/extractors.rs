//! # Request Extraction
//!
//! JSON body extraction with errors mapped onto [`AppError`], plus the
//! [`Validate`] hook for business rules serde cannot express.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Business-rule validation for request DTOs.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body, mapping rejections to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// [`extract_json`] followed by [`Validate::validate`]; rule violations
/// become [`AppError::Validation`].
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Require a JSON object; credentials and presentations are never scalars.
pub(crate) fn require_object(value: &serde_json::Value, what: &str) -> Result<(), String> {
    if value.is_object() {
        Ok(())
    } else {
        Err(format!("{what} must be a JSON object"))
    }
}
