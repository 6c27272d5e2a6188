pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "status": 404,
///   "errorType": "NOT_FOUND",
///   "message": "Product 42 not found"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status code, repeated for clients that only see the body
    pub status: u16,
    /// Machine-readable error kind
    pub error_type: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Structured detail, e.g. per-field validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            error_type: code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Transport-level error. Every failure leaving a handler passes through here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Gateway Timeout: {0}")]
    GatewayTimeout(String),
}

impl AppError {
    /// Status, code, client message and details for this error, logging it once.
    fn classify(self) -> ErrorResponse {
        match self {
            AppError::JsonRejection(e) => {
                let status = match &e {
                    JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    _ => e.status(),
                };
                tracing::info!(
                    status = status.as_u16(),
                    error_code = ErrorCode::InvalidJson.code(),
                    "JSON extraction error: {}",
                    e.body_text()
                );
                ErrorResponse::new(status, ErrorCode::InvalidJson, e.body_text())
            }
            AppError::QueryRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidQuery.code(),
                    "Query extraction error: {}",
                    e.body_text()
                );
                ErrorResponse::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidQuery, e.body_text())
            }
            AppError::ValidationError(e) => {
                let fields = invalid_fields(&e);
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    fields = ?fields,
                    "Validation error"
                );
                ErrorResponse::new(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    format!(
                        "{}: {}",
                        ErrorCode::ValidationError.default_message(),
                        fields.join(", ")
                    ),
                )
                .with_details(validation_details(&e))
            }
            AppError::InvalidId(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidId.code(), "Invalid id: {}", msg);
                ErrorResponse::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidId, msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                ErrorResponse::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, msg)
            }
            AppError::Database(e) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {:?}",
                    e
                );
                ErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    ErrorCode::DatabaseError.default_message(),
                )
            }
            AppError::InternalServerError(detail) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    detail
                );
                ErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    ErrorCode::InternalError.default_message(),
                )
            }
            AppError::GatewayTimeout(msg) => {
                tracing::warn!(error_code = ErrorCode::Timeout.code(), "Timeout: {}", msg);
                ErrorResponse::new(StatusCode::GATEWAY_TIMEOUT, ErrorCode::Timeout, msg)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.classify().into_response()
    }
}

/// Sorted names of the fields that failed validation.
fn invalid_fields(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();
    fields
}

/// `{field: [{code, message, params}]}` for each failed field.
pub fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::ValidationError;

    async fn body_of(error: AppError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_of(AppError::NotFound("Product 7 not found".into())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.status, 404);
        assert_eq!(body.error_type, ErrorCode::NotFound);
        assert_eq!(body.message, "Product 7 not found");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationError::new("length"));
        errors.add("category", ValidationError::new("blank"));

        let (status, body) = body_of(AppError::ValidationError(errors)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_type, ErrorCode::ValidationError);
        assert_eq!(body.message, "Request validation failed: category, name");
        let details = body.details.unwrap();
        assert_eq!(details["name"][0]["code"], "length");
        assert_eq!(details["category"][0]["code"], "blank");
    }

    #[tokio::test]
    async fn test_database_error_hides_detail() {
        let err = DbErr::Custom("relation \"products\" does not exist".into());
        let (status, body) = body_of(AppError::Database(err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error_type, ErrorCode::DatabaseError);
        assert!(!body.message.contains("relation"));
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let (status, body) =
            body_of(AppError::InternalServerError("pool poisoned at 0x7f".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, ErrorCode::InternalError.default_message());
    }

    #[tokio::test]
    async fn test_timeout_maps_to_504() {
        let (status, body) = body_of(AppError::GatewayTimeout("deadline of 5ms exceeded".into())).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body.status, 504);
        assert_eq!(body.error_type, ErrorCode::Timeout);
    }

    #[test]
    fn test_error_response_serializes_camel_case() {
        let body = ErrorResponse::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidId, "nope");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"status": 400, "errorType": "INVALID_ID", "message": "nope"})
        );
    }
}
