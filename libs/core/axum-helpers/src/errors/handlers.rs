use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    ErrorResponse::new(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound,
        "The requested resource was not found",
    )
    .into_response()
}

/// Fallback for known routes hit with the wrong method.
pub async fn method_not_allowed() -> Response {
    ErrorResponse::new(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed,
        ErrorCode::MethodNotAllowed.default_message(),
    )
    .into_response()
}
