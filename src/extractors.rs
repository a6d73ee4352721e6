//! Request extraction helpers
//!
//! Handlers take `Result<Json<T>, JsonRejection>` and
//! `Result<Path<T>, PathRejection>` so that malformed bodies and path
//! parameters surface as validation errors in the API's own error format
//! instead of axum's plain-text rejections.

use crate::error::{validation_error, AppError};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;
use validator::Validate;

/// Extract a JSON body, mapping deserialization errors to [`AppError::Validation`]
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| validation_error(err.body_text()))
}

/// Extract path parameters, mapping parse errors to [`AppError::Validation`]
pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| validation_error(err.body_text()))
}

/// Extract a JSON body and run its `validator` rules
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(|e| validation_error(e.to_string()))?;
    Ok(value)
}
