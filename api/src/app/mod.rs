//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and repository ports.

pub mod book_service;
pub mod loan_service;
pub mod pagination;
pub mod user_service;

pub use book_service::{BookService, CreateBookInput};
pub use loan_service::{BorrowBookInput, LoanService};
pub use pagination::{Page, PageRequest};
pub use user_service::{hash_password, verify_password, CreateUserInput, UpdateUserInput, UserService};
