//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (PostgreSQL, MongoDB).
//!
//! A miss is `Ok(None)`, never an error. Pagination arguments arrive already
//! clamped by the application layer (`page >= 1`, `1 <= limit <= 100`).

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::{Book, BookId, Loan, LoanId, LoanStatus, User, UserId};
use crate::error::DomainError;

/// A loan joined with the borrower's name and the book's title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanWithDetails {
    #[serde(flatten)]
    pub loan: Loan,
    pub user_name: String,
    pub book_title: String,
}

/// Conjunctive filters for loan listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub user_id: Option<UserId>,
    pub status: Option<LoanStatus>,
}

impl LoanFilter {
    pub fn matches(&self, loan: &Loan) -> bool {
        self.user_id.map_or(true, |id| loan.user_id == id)
            && self.status.map_or(true, |status| loan.status == status)
    }
}

/// Largest offset both stores accept; Postgres and MongoDB take a signed 64-bit skip
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Offset of the first row of a 1-based page, capped at [`MAX_OFFSET`]
pub fn page_offset(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit).min(MAX_OFFSET)
}

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Find a user by ID
    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// One page of users, newest first, with the total count
    async fn list(&self, page: u64, limit: u64) -> Result<(Vec<User>, u64), DomainError>;

    /// Overwrite a stored user
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;
}

/// Repository for Book entities
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Persist a new book
    async fn create(&self, book: &Book) -> Result<(), DomainError>;

    /// Find a book by ID
    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, DomainError>;

    /// Find a book by ISBN
    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError>;

    /// One page of books, newest first, with the total count.
    /// `available_only` keeps books with at least one free copy.
    async fn list(
        &self,
        page: u64,
        limit: u64,
        available_only: bool,
    ) -> Result<(Vec<Book>, u64), DomainError>;

    /// Overwrite a stored book, including its copy counters
    async fn update(&self, book: &Book) -> Result<(), DomainError>;

    async fn delete(&self, id: &BookId) -> Result<(), DomainError>;
}

/// Repository for Loan entities
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Persist a new loan
    async fn create(&self, loan: &Loan) -> Result<(), DomainError>;

    /// Find a loan by ID
    async fn get_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError>;

    /// The active loan for a (user, book) pair, if any
    async fn get_active_by_user_and_book(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Option<Loan>, DomainError>;

    /// One page of loans, most recently borrowed first, with the total count
    async fn list(
        &self,
        page: u64,
        limit: u64,
        filter: &LoanFilter,
    ) -> Result<(Vec<Loan>, u64), DomainError>;

    /// Overwrite a stored loan
    async fn update(&self, loan: &Loan) -> Result<(), DomainError>;

    /// Find a loan by ID, enriched with user name and book title
    async fn get_by_id_with_details(
        &self,
        id: &LoanId,
    ) -> Result<Option<LoanWithDetails>, DomainError>;

    /// Same as `list`, enriched with user names and book titles
    async fn list_with_details(
        &self,
        page: u64,
        limit: u64,
        filter: &LoanFilter,
    ) -> Result<(Vec<LoanWithDetails>, u64), DomainError>;
}
