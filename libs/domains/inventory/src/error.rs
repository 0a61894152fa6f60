use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::FieldViolation;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(i64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("A product named '{0}' already exists")]
    DuplicateName(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Any storage-layer fault, passed through untouched
    #[error("Storage error: {0}")]
    Database(#[from] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Flattened field-level violations, ordered by field name. Empty for
    /// anything other than [`ProductError::Validation`].
    pub fn field_violations(&self) -> Vec<FieldViolation> {
        let ProductError::Validation(errors) = self else {
            return Vec::new();
        };

        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldViolation {
                    field: field.to_string(),
                    code: err.code.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();

        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        violations
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::InvalidArgument(msg) => AppError::BadRequest(msg),
            ProductError::DuplicateName(name) => {
                AppError::Conflict(format!("A product named '{}' already exists", name))
            }
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
