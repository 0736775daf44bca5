//! Unified error types for the BookHub API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors, one variant per domain sentinel
//! - `AuthError`: Token issuance and validation errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // User
    #[error("invalid user name: must be between 3 and 100 characters")]
    InvalidUserName,

    #[error("invalid user email format")]
    InvalidUserEmail,

    #[error("invalid password: must be at least 6 characters")]
    InvalidUserPassword,

    #[error("user is disabled")]
    UserDisabled,

    #[error("user is already disabled")]
    UserAlreadyDisabled,

    #[error("user not found")]
    UserNotFound,

    #[error("email already exists")]
    EmailAlreadyExists,

    // Book
    #[error("invalid book title: must be between 1 and 200 characters")]
    InvalidBookTitle,

    #[error("invalid book author: must be between 1 and 100 characters")]
    InvalidBookAuthor,

    #[error("invalid ISBN: must be 10 or 13 digits")]
    InvalidBookIsbn,

    #[error("ISBN already exists")]
    IsbnAlreadyExists,

    #[error("invalid total copies: must be at least 1")]
    InvalidTotalCopies,

    #[error("book not found")]
    BookNotFound,

    #[error("book not available: all copies are borrowed")]
    BookNotAvailable,

    #[error("invalid available copies")]
    InvalidAvailableCopies,

    // Loan
    #[error("loan not found")]
    LoanNotFound,

    #[error("loan already returned")]
    LoanAlreadyReturned,

    #[error("invalid due date: must be in the future")]
    InvalidLoanDueDate,

    #[error("user already has an active loan for this book")]
    UserHasActiveLoan,

    // Infrastructure
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// True for the entity validation sentinels
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidUserName
                | DomainError::InvalidUserEmail
                | DomainError::InvalidUserPassword
                | DomainError::InvalidBookTitle
                | DomainError::InvalidBookAuthor
                | DomainError::InvalidBookIsbn
                | DomainError::InvalidTotalCopies
                | DomainError::InvalidAvailableCopies
                | DomainError::InvalidLoanDueDate
        )
    }
}

/// Token service errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("authorization header is required")]
    MissingToken,

    #[error("invalid authorization header format")]
    MalformedHeader,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Domain(e) => match e {
                DomainError::UserNotFound
                | DomainError::BookNotFound
                | DomainError::LoanNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                DomainError::EmailAlreadyExists => (StatusCode::BAD_REQUEST, "EMAIL_EXISTS"),
                DomainError::IsbnAlreadyExists => (StatusCode::BAD_REQUEST, "ISBN_EXISTS"),
                DomainError::UserDisabled | DomainError::UserAlreadyDisabled => {
                    (StatusCode::BAD_REQUEST, "USER_DISABLED")
                }
                DomainError::BookNotAvailable => (StatusCode::BAD_REQUEST, "BOOK_UNAVAILABLE"),
                DomainError::LoanAlreadyReturned => (StatusCode::BAD_REQUEST, "ALREADY_RETURNED"),
                DomainError::UserHasActiveLoan => {
                    (StatusCode::BAD_REQUEST, "ACTIVE_LOAN_EXISTS")
                }
                e if e.is_validation() => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
            AppError::Auth(AuthError::Signing(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
            AppError::Auth(_) | AppError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let error = match &self {
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %self, "Request failed");
                "internal server error".to_string()
            }
            AppError::Domain(e) => e.to_string(),
            AppError::Auth(e) => e.to_string(),
            AppError::BadRequest(msg) | AppError::Unauthorized(msg) | AppError::Internal(msg) => {
                msg.clone()
            }
        };

        (status, Json(ErrorResponse { error, code })).into_response()
    }
}
