use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use std::time::Duration;
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::ProductId;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(ProductId),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),

    #[error("Operation exceeded deadline of {0:?}")]
    Timeout(Duration),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::Storage(e) => AppError::Database(e),
            ProductError::Timeout(deadline) => AppError::GatewayTimeout(format!(
                "Operation exceeded deadline of {}ms",
                deadline.as_millis()
            )),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
