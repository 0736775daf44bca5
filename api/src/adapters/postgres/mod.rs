//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod book_repo;
pub mod loan_repo;
pub mod schema;
pub mod user_repo;


use sea_orm::{DbErr, SqlErr};

use crate::error::DomainError;

pub use book_repo::PostgresBookRepository;
pub use loan_repo::PostgresLoanRepository;
pub use schema::ensure_schema;
pub use user_repo::PostgresUserRepository;

/// Translate a failed write, surfacing constraint violations as domain errors
pub(crate) fn write_error(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(message)) = e.sql_err() {
        if message.contains(schema::USERS_EMAIL_KEY) {
            return DomainError::EmailAlreadyExists;
        }
        if message.contains(schema::BOOKS_ISBN_KEY) {
            return DomainError::IsbnAlreadyExists;
        }
        if message.contains(schema::LOANS_ACTIVE_PAIR_INDEX) {
            return DomainError::UserHasActiveLoan;
        }
    }

    let message = e.to_string();
    if message.contains(schema::BOOKS_COPIES_CHECK) {
        return DomainError::InvalidAvailableCopies;
    }

    DomainError::Database(message)
}
