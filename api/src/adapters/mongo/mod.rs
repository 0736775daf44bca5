//! MongoDB adapters
//!
//! Implementations of repository traits using the official MongoDB driver.

pub mod book_repo;
pub mod documents;
pub mod indexes;
pub mod loan_repo;
pub mod user_repo;


use mongodb::error::{Error, ErrorKind, WriteFailure};

use crate::error::DomainError;

pub use book_repo::MongoBookRepository;
pub use indexes::ensure_indexes;
pub use loan_repo::MongoLoanRepository;
pub use user_repo::MongoUserRepository;

const DUPLICATE_KEY: i32 = 11000;

/// Translate a driver error, surfacing unique-index violations as domain errors
pub(crate) fn db_error(e: Error) -> DomainError {
    if let ErrorKind::Write(WriteFailure::WriteError(ref failure)) = *e.kind {
        if failure.code == DUPLICATE_KEY {
            if failure.message.contains(indexes::USERS_EMAIL_INDEX) {
                return DomainError::EmailAlreadyExists;
            }
            if failure.message.contains(indexes::BOOKS_ISBN_INDEX) {
                return DomainError::IsbnAlreadyExists;
            }
        }
    }

    DomainError::Database(e.to_string())
}
