//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic conversion into the response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::SqlErr;
use thiserror::Error;

use crate::types::ApiResponse;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Account errors
    #[error("Email is already registered")]
    DuplicateEmail,

    /// Unknown email, wrong password and inactive account all collapse here.
    #[error("Email or password does not match")]
    InvalidCredentials,

    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("{0}")]
    UnsupportedOperation(String),

    #[error("Failed to delete {entity}")]
    DeleteFailed {
        entity: &'static str,
        #[source]
        source: Box<AppError>,
    },

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Storage error")]
    Io(#[from] std::io::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            AppError::UnsupportedOperation(_) => "UNSUPPORTED_OPERATION",
            AppError::DeleteFailed { .. } => "DELETE_FAILED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Io(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::UnsupportedOperation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEmail | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DeleteFailed { .. }
            | AppError::Database(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Io(e) => {
                tracing::error!("Storage error: {:?}", e);
                "A storage error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::DeleteFailed { entity, source } => {
                tracing::error!(entity, cause = ?source, "Delete failed");
                self.to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body: ApiResponse<()> = ApiResponse::error(self.code(), self.user_message());

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &'static str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &'static str) -> AppResult<T> {
        self.ok_or(AppError::NotFound(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        AppError::UnsupportedOperation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn delete_failed(entity: &'static str, source: AppError) -> Self {
        AppError::DeleteFailed {
            entity,
            source: Box::new(source),
        }
    }

    /// Map a database error raised while inserting, translating constraint
    /// violations into domain errors.
    ///
    /// `missing` names the referenced entity reported on a foreign-key miss.
    pub fn from_insert(err: sea_orm::DbErr, missing: &'static str) -> Self {
        let violation = err.sql_err();
        Self::from_violation(violation, err, missing)
    }

    fn from_violation(
        violation: Option<SqlErr>,
        err: sea_orm::DbErr,
        missing: &'static str,
    ) -> Self {
        match violation {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateEmail,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::NotFound(missing),
            _ => AppError::Database(err),
        }
    }
}
