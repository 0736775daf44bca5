//! Book service
//!
//! Catalog management: adding titles, lookups, and availability listings.

use std::sync::Arc;

use crate::app::pagination::{Page, PageRequest};
use crate::domain::entities::{Book, BookId};
use crate::domain::ports::BookRepository;
use crate::error::DomainError;

/// Input for adding a book to the catalog
#[derive(Debug, Clone)]
pub struct CreateBookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// 0 when unknown
    pub published_year: i32,
    pub total_copies: i32,
}

/// Service for managing the book catalog
pub struct BookService<BR>
where
    BR: BookRepository + ?Sized,
{
    books: Arc<BR>,
}

impl<BR> BookService<BR>
where
    BR: BookRepository + ?Sized,
{
    pub fn new(books: Arc<BR>) -> Self {
        Self { books }
    }

    /// Add a book
    ///
    /// A duplicate ISBN found by the pre-check is reported as an invalid ISBN.
    /// A storage error during that lookup is logged and ignored.
    pub async fn create(&self, input: CreateBookInput) -> Result<Book, DomainError> {
        match self.books.get_by_isbn(&input.isbn).await {
            Ok(Some(_)) => return Err(DomainError::InvalidBookIsbn),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, isbn = %input.isbn, "ISBN uniqueness check failed, assuming no duplicate");
            }
        }

        let book = Book::new(
            &input.title,
            &input.author,
            &input.isbn,
            input.published_year,
            input.total_copies,
        )?;

        self.books.create(&book).await?;

        tracing::info!(book_id = %book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    pub async fn get_by_id(&self, id: &BookId) -> Result<Book, DomainError> {
        self.books
            .get_by_id(id)
            .await?
            .ok_or(DomainError::BookNotFound)
    }

    /// List books, newest first, optionally only those with a free copy
    pub async fn list(
        &self,
        page: i64,
        limit: i64,
        available_only: bool,
    ) -> Result<Page<Book>, DomainError> {
        let request = PageRequest::clamped(page, limit);
        let (books, total) = self
            .books
            .list(request.page, request.limit, available_only)
            .await?;
        Ok(Page::new(books, request, total))
    }
}
