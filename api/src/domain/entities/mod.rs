//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod book;
pub mod loan;
pub mod user;

pub use book::{is_valid_isbn, Availability, Book, BookId};
pub use loan::{Loan, LoanId, LoanStatus, DEFAULT_LOAN_DAYS};
pub use user::{is_valid_email, User, UserId};
