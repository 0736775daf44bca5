//! Loan service
//!
//! The borrow/return workflow. Each call is a sequence of independent
//! repository round-trips with no surrounding transaction: two concurrent
//! borrows of the last copy can both pass the availability check. Stores that
//! enforce a counter constraint or an active-loan unique key reject the loser;
//! stores that do not will let both through. A rejected loan insert puts the
//! already-decremented copy back.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::app::pagination::{Page, PageRequest};
use crate::domain::entities::{Book, BookId, Loan, LoanId, UserId};
use crate::domain::ports::{
    BookRepository, LoanFilter, LoanRepository, LoanWithDetails, UserRepository,
};
use crate::error::DomainError;

/// Input for borrowing a book
#[derive(Debug, Clone)]
pub struct BorrowBookInput {
    pub user_id: UserId,
    pub book_id: BookId,
    /// Defaults to 14 days from now
    pub due_date: Option<DateTime<Utc>>,
}

/// Service orchestrating loans across users and books
pub struct LoanService<LR, BR, UR>
where
    LR: LoanRepository + ?Sized,
    BR: BookRepository + ?Sized,
    UR: UserRepository + ?Sized,
{
    loans: Arc<LR>,
    books: Arc<BR>,
    users: Arc<UR>,
}

impl<LR, BR, UR> LoanService<LR, BR, UR>
where
    LR: LoanRepository + ?Sized,
    BR: BookRepository + ?Sized,
    UR: UserRepository + ?Sized,
{
    pub fn new(loans: Arc<LR>, books: Arc<BR>, users: Arc<UR>) -> Self {
        Self {
            loans,
            books,
            users,
        }
    }

    /// Lend one copy of a book to a user
    ///
    /// Order of checks:
    /// 1. user exists and is active
    /// 2. book exists and has a free copy
    /// 3. no active loan for the same (user, book) pair
    /// 4. due date is valid
    ///
    /// The book counter is written before the loan is created.
    pub async fn borrow_book(&self, input: BorrowBookInput) -> Result<LoanWithDetails, DomainError> {
        let user = self
            .users
            .get_by_id(&input.user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if !user.is_active() {
            return Err(DomainError::UserDisabled);
        }

        let mut book = self
            .books
            .get_by_id(&input.book_id)
            .await?
            .ok_or(DomainError::BookNotFound)?;

        if !book.is_available() {
            return Err(DomainError::BookNotAvailable);
        }

        // Best-effort: only a found loan blocks, a lookup error does not
        match self
            .loans
            .get_active_by_user_and_book(&input.user_id, &input.book_id)
            .await
        {
            Ok(Some(_)) => return Err(DomainError::UserHasActiveLoan),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    user_id = %input.user_id,
                    book_id = %input.book_id,
                    "Active loan lookup failed, continuing"
                );
            }
        }

        let loan = Loan::new(input.user_id, input.book_id, input.due_date)?;

        book.borrow_copy()?;
        self.books.update(&book).await?;

        if let Err(e) = self.loans.create(&loan).await {
            self.restore_copy(&mut book).await;
            return Err(e);
        }

        tracing::info!(
            loan_id = %loan.id,
            user_id = %loan.user_id,
            book_id = %loan.book_id,
            available_copies = book.available_copies,
            "Book borrowed"
        );

        Ok(LoanWithDetails {
            loan,
            user_name: user.name,
            book_title: book.title,
        })
    }

    /// Undo a persisted decrement after the loan insert was rejected
    async fn restore_copy(&self, book: &mut Book) {
        let restored = match book.return_copy() {
            Ok(()) => self.books.update(book).await,
            Err(e) => Err(e),
        };
        if let Err(e) = restored {
            tracing::warn!(
                error = %e,
                book_id = %book.id,
                "Failed to restore copy after rejected loan"
            );
        }
    }

    /// Close a loan and put the copy back on the shelf
    pub async fn return_book(&self, loan_id: &LoanId) -> Result<LoanWithDetails, DomainError> {
        let mut details = self
            .loans
            .get_by_id_with_details(loan_id)
            .await?
            .ok_or(DomainError::LoanNotFound)?;

        details.loan.mark_returned()?;

        let mut book = self
            .books
            .get_by_id(&details.loan.book_id)
            .await?
            .ok_or(DomainError::BookNotFound)?;

        book.return_copy()?;
        self.books.update(&book).await?;
        self.loans.update(&details.loan).await?;

        tracing::info!(
            loan_id = %details.loan.id,
            book_id = %book.id,
            available_copies = book.available_copies,
            "Book returned"
        );

        Ok(details)
    }

    pub async fn get_by_id(&self, id: &LoanId) -> Result<LoanWithDetails, DomainError> {
        self.loans
            .get_by_id_with_details(id)
            .await?
            .ok_or(DomainError::LoanNotFound)
    }

    /// List loans, most recent first; filters combine with AND
    pub async fn list(
        &self,
        page: i64,
        limit: i64,
        filter: LoanFilter,
    ) -> Result<Page<LoanWithDetails>, DomainError> {
        let request = PageRequest::clamped(page, limit);
        let (loans, total) = self
            .loans
            .list_with_details(request.page, request.limit, &filter)
            .await?;
        Ok(Page::new(loans, request, total))
    }
}
