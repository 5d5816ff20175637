//! # Error Handling
//!
//! [`ApiError`] is the HTTP-facing wrapper for every error the engine produces. It:
//! - maps each failure class to its status code (400, 422 or 500)
//! - returns a sanitized JSON body (`{"error": ..., "details": [...]}`)
//! - logs internal detail with `tracing` before responding
//!
//! Engine errors convert with `?`:
//!
//! ```rust,ignore
//! async fn list_users(Query(query): Query<ListQuery>) -> Result<Json<Vec<User>>, ApiError> {
//!     let selectors = query.selectors()?.to_db_selectors(&USER_FIELDS)?;
//!     let condition = to_condition(&selectors)?;
//!     // ...
//! }
//! ```
//!
//! Picking and decoding failures never reach the client verbatim: they carry raw request
//! detail or point at a schema defect, so the client only sees "Invalid input".
//! Validation and translation failures name the offending field or predicate and are
//! returned as they are.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::filtering::TranslationError;
use crate::request::{DecodeError, PickError};
use crate::schema::SchemaError;
use crate::validation::ValidationError;

const INVALID_INPUT: &str = "Invalid input";

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - Invalid filter, sort or update from the client
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 422 Unprocessable Entity - Validation failed
    ValidationFailed {
        /// User-facing validation errors
        errors: Vec<String>,
    },

    /// 400 Bad Request - Unreadable request data (details logged, not exposed)
    InvalidInput {
        /// Internal error (logged, not sent to user)
        internal: String,
    },

    /// 500 Internal Server Error - Generic internal error
    Internal {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ApiError {
    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 422 Validation Failed error
    #[must_use]
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// Create a 400 error whose detail is only logged
    pub fn invalid_input(internal: impl Into<String>) -> Self {
        Self::InvalidInput {
            internal: internal.into(),
        }
    }

    /// Create a 500 Internal Server Error with optional details
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } | Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message } | Self::Internal { message, .. } => message.clone(),
            Self::ValidationFailed { errors } => match errors.as_slice() {
                [single] => single.clone(),
                _ => format!("Validation failed: {}", errors.join(", ")),
            },
            Self::InvalidInput { .. } => INVALID_INPUT.to_string(),
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::InvalidInput { internal } => {
                tracing::warn!(details = %internal, "Rejected unreadable request input");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    /// Error message
    error: String,
    /// Optional list of validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.clone()),
            },
            _ => ErrorResponse {
                error: self.user_message(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationFailed {
            errors: vec![err.message],
        }
    }
}

impl From<PickError> for ApiError {
    fn from(err: PickError) -> Self {
        Self::InvalidInput {
            internal: err.to_string(),
        }
    }
}

/// A decode failure means the schema and its destination type disagree, so it is
/// logged at error level here rather than when the response is built.
impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        tracing::error!(details = %err, "Validated input does not match its destination type");
        Self::InvalidInput {
            internal: err.to_string(),
        }
    }
}

impl From<TranslationError> for ApiError {
    fn from(err: TranslationError) -> Self {
        Self::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        Self::Internal {
            message: "Server misconfiguration".to_string(),
            internal: Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request() {
        let err = ApiError::bad_request("invalid field: ssn");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "invalid field: ssn");
    }

    #[test]
    fn test_validation_failed_single_error() {
        let err = ApiError::validation_failed(vec![r#"field "name" is required"#.to_string()]);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.user_message(), r#"field "name" is required"#);
    }

    #[test]
    fn test_validation_failed_multiple_errors() {
        let err = ApiError::validation_failed(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.user_message(), "Validation failed: a, b");
    }

    #[test]
    fn test_invalid_input_hides_details() {
        let err = ApiError::invalid_input("expected value at line 1 column 7");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "Invalid input");
        assert!(!err.to_string().contains("line 1"));
    }

    #[test]
    fn test_internal_error_with_details() {
        let err = ApiError::internal("Processing failed", Some("rule missing".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "Processing failed");
    }

    #[test]
    fn test_from_validation_error() {
        let api_err: ApiError = ValidationError::required("name").into();
        assert!(matches!(
            api_err,
            ApiError::ValidationFailed { ref errors }
                if errors == &[r#"field "name" is required"#.to_string()]
        ));
    }

    #[test]
    fn test_from_pick_error_is_sanitized() {
        let api_err: ApiError = PickError::Conversion {
            field: "id".to_string(),
            detail: "bad uuid 'secret'".to_string(),
        }
        .into();
        assert_eq!(api_err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(api_err.user_message(), "Invalid input");
    }

    #[test]
    fn test_from_decode_error_is_sanitized() {
        let api_err: ApiError = DecodeError {
            detail: "invalid type: string \"x\", expected i64".to_string(),
        }
        .into();
        assert_eq!(api_err.user_message(), "Invalid input");
    }

    #[test]
    fn test_from_translation_error() {
        let api_err: ApiError = TranslationError::InvalidField {
            field: "ssn".to_string(),
        }
        .into();
        assert_eq!(api_err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(api_err.user_message(), "invalid field: ssn");
    }

    #[test]
    fn test_from_schema_error_is_internal() {
        let api_err: ApiError = SchemaError::UnknownRule {
            path: "email".to_string(),
            rule: "emial".to_string(),
        }
        .into();
        assert_eq!(api_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api_err.user_message().contains("emial"));
    }

    #[test]
    fn test_display_trait() {
        let err = ApiError::bad_request("Test error");
        assert_eq!(format!("{err}"), "Test error");
    }

    #[test]
    fn test_error_trait() {
        let err = ApiError::bad_request("Test error");
        let _: &dyn std::error::Error = &err;
    }
}
