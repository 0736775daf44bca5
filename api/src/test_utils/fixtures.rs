//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use uuid::Uuid;

use crate::app::hash_password;
use crate::domain::entities::{Book, Loan, User};

/// Create an active test user with a unique email
pub fn test_user() -> User {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    User::new(
        "Test Reader",
        &format!("reader-{}@example.com", suffix),
        "hashed-password",
    )
    .unwrap()
}

/// Create a test user with a specific name and email
pub fn test_user_named(name: &str, email: &str) -> User {
    User::new(name, email, "hashed-password").unwrap()
}

/// Create a test user whose stored hash matches `password`
pub fn test_user_with_password(password: &str) -> User {
    let hash = hash_password(password).unwrap();
    let mut user = test_user();
    user.password_hash = hash;
    user
}

/// Create a test book with three copies and a unique ISBN
pub fn test_book() -> Book {
    test_book_with_copies(3)
}

/// Create a test book with the given number of copies
pub fn test_book_with_copies(copies: i32) -> Book {
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(13)
        .collect();
    Book::new("Test Book", "Test Author", &digits, 2020, copies).unwrap()
}

/// Create an active loan for a user and book, due in 14 days
pub fn test_loan(user: &User, book: &Book) -> Loan {
    Loan::new(user.id, book.id, None).unwrap()
}
