//! Stable error codes carried in every error body.
//!
//! Each code has three faces:
//! - a SCREAMING_SNAKE_CASE identifier sent to clients as `errorType`
//! - an integer used as the `error_code` field in logs
//! - a default human-readable message
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotFound;
//! assert_eq!(code.as_str(), "NOT_FOUND");
//! assert_eq!(code.code(), 1005);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Request body or query failed field validation
    ValidationError,
    /// Path identifier is not a valid integer id
    InvalidId,
    /// Request body is not valid JSON for the expected shape
    InvalidJson,
    /// Query string could not be decoded
    InvalidQuery,
    /// Requested resource does not exist
    NotFound,
    /// Route exists but not for this HTTP method
    MethodNotAllowed,

    // Server errors (1100s)
    InternalError,
    /// Operation exceeded its deadline
    Timeout,

    // Storage errors (2000s)
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Integer code for structured logs and alerting.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::InvalidJson => 1003,
            Self::InvalidQuery => 1004,
            Self::NotFound => 1005,
            Self::MethodNotAllowed => 1006,
            Self::InternalError => 1101,
            Self::Timeout => 1103,
            Self::DatabaseError => 2001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid resource id",
            Self::InvalidJson => "Invalid JSON body",
            Self::InvalidQuery => "Invalid query parameters",
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::InternalError => "An internal server error occurred",
            Self::Timeout => "The operation timed out",
            Self::DatabaseError => "A storage error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
