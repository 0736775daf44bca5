//! Book domain entity
//!
//! A catalog title with a fixed number of physical copies. The available-copy
//! counter is the only state the loan workflow mutates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const TITLE_MAX_LEN: usize = 200;
const AUTHOR_MAX_LEN: usize = 100;

/// Unique identifier for a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(pub Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BookId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Availability derived from the copy counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable,
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::Available => write!(f, "available"),
            Availability::Unavailable => write!(f, "unavailable - all copies borrowed"),
        }
    }
}

/// A book in the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// 0 when unknown
    pub published_year: i32,
    pub total_copies: i32,
    pub available_copies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new book with every copy available.
    ///
    /// Checks run in order: title, author, ISBN, total copies.
    pub fn new(
        title: &str,
        author: &str,
        isbn: &str,
        published_year: i32,
        total_copies: i32,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();
        let book = Self {
            id: BookId::new(),
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            published_year,
            total_copies,
            available_copies: total_copies,
            created_at: now,
            updated_at: now,
        };

        book.validate()?;
        Ok(book)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let title_len = self.title.chars().count();
        if title_len < 1 || title_len > TITLE_MAX_LEN {
            return Err(DomainError::InvalidBookTitle);
        }

        let author_len = self.author.chars().count();
        if author_len < 1 || author_len > AUTHOR_MAX_LEN {
            return Err(DomainError::InvalidBookAuthor);
        }

        if !is_valid_isbn(&self.isbn) {
            return Err(DomainError::InvalidBookIsbn);
        }

        if self.total_copies < 1 {
            return Err(DomainError::InvalidTotalCopies);
        }

        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    pub fn availability(&self) -> Availability {
        if self.is_available() {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    /// Take one copy off the shelf
    pub fn borrow_copy(&mut self) -> Result<(), DomainError> {
        if !self.is_available() {
            return Err(DomainError::BookNotAvailable);
        }
        self.available_copies -= 1;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Put one copy back; refuses to exceed `total_copies`
    pub fn return_copy(&mut self) -> Result<(), DomainError> {
        if self.available_copies >= self.total_copies {
            return Err(DomainError::InvalidAvailableCopies);
        }
        self.available_copies += 1;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Exactly 10 or 13 ASCII digits. No checksum validation.
pub fn is_valid_isbn(isbn: &str) -> bool {
    matches!(isbn.len(), 10 | 13) && isbn.bytes().all(|b| b.is_ascii_digit())
}
