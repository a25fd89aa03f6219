//! Error types for the library server

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::response::BaseResponse;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book not found with id : {0}")]
    BookNotFound(i64),

    #[error("Student not found with id : {0}")]
    StudentNotFound(i64),

    #[error("Student not found with fin code : {0}")]
    StudentFinCodeNotFound(String),

    #[error("Order not found with id : {0}")]
    OrderNotFound(i64),

    #[error("Book is out of stock.")]
    BookOutOfStock,

    #[error("A student with this fin code already exists.")]
    FinCodeAlreadyExists,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BookNotFound(_)
            | AppError::StudentNotFound(_)
            | AppError::StudentFinCodeNotFound(_)
            | AppError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BookOutOfStock | AppError::FinCodeAlreadyExists | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        };

        (status, Json(BaseResponse::<()>::failure(status, message))).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
