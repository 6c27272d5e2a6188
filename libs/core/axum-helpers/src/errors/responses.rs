//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "status": 500,
        "errorType": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "status": 400,
        "errorType": "VALIDATION_ERROR",
        "message": "Request validation failed: name",
        "details": {
            "name": [{
                "code": "blank",
                "message": "must not be blank",
                "params": {"value": "   "}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid id",
    content_type = "application/json",
    example = json!({
        "status": 400,
        "errorType": "INVALID_ID",
        "message": "'abc' is not a valid id"
    })
)]
pub struct BadRequestIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "status": 404,
        "errorType": "NOT_FOUND",
        "message": "Product 42 not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Gateway Timeout - operation exceeded its deadline",
    content_type = "application/json",
    example = json!({
        "status": 504,
        "errorType": "TIMEOUT",
        "message": "Operation exceeded deadline of 5000ms"
    })
)]
pub struct GatewayTimeoutResponse(pub ErrorResponse);
