//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.
//!
//! Cloning a repository shares its storage, so a test can keep a handle for
//! assertions while the service under test owns another. Unique keys (email,
//! ISBN, one active loan per user and book) are enforced on insert the way
//! the PostgreSQL schema enforces them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{Book, BookId, Loan, LoanId, User, UserId};
use crate::domain::ports::{
    page_offset, BookRepository, LoanFilter, LoanRepository, LoanWithDetails, UserRepository,
};
use crate::error::DomainError;

fn mock_failure() -> DomainError {
    DomainError::Database("Mock failure".to_string())
}

fn paginate<T>(items: Vec<T>, page: u64, limit: u64) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let page_items = items
        .into_iter()
        .skip(usize::try_from(page_offset(page, limit)).unwrap_or(usize::MAX))
        .take(limit as usize)
        .collect();
    (page_items, total)
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    pub should_fail: Arc<RwLock<bool>>,
    pub fail_email_lookup: Arc<RwLock<bool>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call returns a database error
    pub fn failing() -> Self {
        let repo = Self::default();
        *repo.should_fail.write().unwrap() = true;
        repo
    }

    /// Only `get_by_email` fails
    pub fn failing_email_lookup(self) -> Self {
        *self.fail_email_lookup.write().unwrap() = true;
        self
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }

    fn check(&self) -> Result<(), DomainError> {
        if *self.should_fail.read().unwrap() {
            return Err(mock_failure());
        }
        Ok(())
    }

    fn name_of(&self, id: &UserId) -> Option<String> {
        self.users.read().unwrap().get(id).map(|u| u.name.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        self.check()?;
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.check()?;
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.check()?;
        if *self.fail_email_lookup.read().unwrap() {
            return Err(mock_failure());
        }
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, page: u64, limit: u64) -> Result<(Vec<User>, u64), DomainError> {
        self.check()?;
        let mut users: Vec<User> = self.users.read().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(users, page, limit))
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        self.check()?;
        let mut users = self.users.write().unwrap();
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DomainError::EmailAlreadyExists);
        }
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(DomainError::UserNotFound),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        self.check()?;
        self.users.write().unwrap().remove(id);
        Ok(())
    }
}

// ============================================================================
// In-Memory Book Repository
// ============================================================================

#[derive(Default, Clone)]
pub struct InMemoryBookRepository {
    books: Arc<RwLock<HashMap<BookId, Book>>>,
    pub should_fail: Arc<RwLock<bool>>,
    pub fail_isbn_lookup: Arc<RwLock<bool>>,
    pub fail_updates: Arc<RwLock<bool>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call returns a database error
    pub fn failing() -> Self {
        let repo = Self::default();
        *repo.should_fail.write().unwrap() = true;
        repo
    }

    /// Only `get_by_isbn` fails
    pub fn failing_isbn_lookup(self) -> Self {
        *self.fail_isbn_lookup.write().unwrap() = true;
        self
    }

    /// Toggle failure of `update` at runtime
    pub fn set_fail_updates(&self, fail: bool) {
        *self.fail_updates.write().unwrap() = fail;
    }

    /// Pre-populate with a book for testing
    pub fn with_book(self, book: Book) -> Self {
        self.books.write().unwrap().insert(book.id, book);
        self
    }

    fn check(&self) -> Result<(), DomainError> {
        if *self.should_fail.read().unwrap() {
            return Err(mock_failure());
        }
        Ok(())
    }

    fn title_of(&self, id: &BookId) -> Option<String> {
        self.books.read().unwrap().get(id).map(|b| b.title.clone())
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create(&self, book: &Book) -> Result<(), DomainError> {
        self.check()?;
        let mut books = self.books.write().unwrap();
        if books.values().any(|b| b.isbn == book.isbn) {
            return Err(DomainError::IsbnAlreadyExists);
        }
        books.insert(book.id, book.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        self.check()?;
        Ok(self.books.read().unwrap().get(id).cloned())
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        self.check()?;
        if *self.fail_isbn_lookup.read().unwrap() {
            return Err(mock_failure());
        }
        Ok(self
            .books
            .read()
            .unwrap()
            .values()
            .find(|b| b.isbn == isbn)
            .cloned())
    }

    async fn list(
        &self,
        page: u64,
        limit: u64,
        available_only: bool,
    ) -> Result<(Vec<Book>, u64), DomainError> {
        self.check()?;
        let mut books: Vec<Book> = self
            .books
            .read()
            .unwrap()
            .values()
            .filter(|b| !available_only || b.available_copies > 0)
            .cloned()
            .collect();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(books, page, limit))
    }

    async fn update(&self, book: &Book) -> Result<(), DomainError> {
        self.check()?;
        if *self.fail_updates.read().unwrap() {
            return Err(mock_failure());
        }
        if book.available_copies < 0 || book.available_copies > book.total_copies {
            return Err(DomainError::InvalidAvailableCopies);
        }
        match self.books.write().unwrap().get_mut(&book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(())
            }
            None => Err(DomainError::BookNotFound),
        }
    }

    async fn delete(&self, id: &BookId) -> Result<(), DomainError> {
        self.check()?;
        self.books.write().unwrap().remove(id);
        Ok(())
    }
}

// ============================================================================
// In-Memory Loan Repository
// ============================================================================

/// Loans are enriched from the user and book repositories it was built with.
/// A missing user or book yields an empty name or title.
#[derive(Default, Clone)]
pub struct InMemoryLoanRepository {
    loans: Arc<RwLock<HashMap<LoanId, Loan>>>,
    users: InMemoryUserRepository,
    books: InMemoryBookRepository,
    pub should_fail: Arc<RwLock<bool>>,
    pub fail_active_lookup: Arc<RwLock<bool>>,
}

impl InMemoryLoanRepository {
    pub fn new(users: InMemoryUserRepository, books: InMemoryBookRepository) -> Self {
        Self {
            users,
            books,
            ..Self::default()
        }
    }

    /// Every call returns a database error
    pub fn failing() -> Self {
        let repo = Self::default();
        *repo.should_fail.write().unwrap() = true;
        repo
    }

    /// Toggle failure of `get_active_by_user_and_book` at runtime
    pub fn set_fail_active_lookup(&self, fail: bool) {
        *self.fail_active_lookup.write().unwrap() = fail;
    }

    /// Pre-populate with a loan for testing
    pub fn with_loan(self, loan: Loan) -> Self {
        self.loans.write().unwrap().insert(loan.id, loan);
        self
    }

    fn check(&self) -> Result<(), DomainError> {
        if *self.should_fail.read().unwrap() {
            return Err(mock_failure());
        }
        Ok(())
    }

    fn enrich(&self, loan: Loan) -> LoanWithDetails {
        LoanWithDetails {
            user_name: self.users.name_of(&loan.user_id).unwrap_or_default(),
            book_title: self.books.title_of(&loan.book_id).unwrap_or_default(),
            loan,
        }
    }

    fn filtered(&self, filter: &LoanFilter) -> Vec<Loan> {
        let mut loans: Vec<Loan> = self
            .loans
            .read()
            .unwrap()
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        loans.sort_by(|a, b| b.borrowed_at.cmp(&a.borrowed_at));
        loans
    }
}

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn create(&self, loan: &Loan) -> Result<(), DomainError> {
        self.check()?;
        let mut loans = self.loans.write().unwrap();
        if loan.is_active()
            && loans.values().any(|l| {
                l.is_active() && l.user_id == loan.user_id && l.book_id == loan.book_id
            })
        {
            return Err(DomainError::UserHasActiveLoan);
        }
        loans.insert(loan.id, loan.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError> {
        self.check()?;
        Ok(self.loans.read().unwrap().get(id).cloned())
    }

    async fn get_active_by_user_and_book(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Option<Loan>, DomainError> {
        self.check()?;
        if *self.fail_active_lookup.read().unwrap() {
            return Err(mock_failure());
        }
        Ok(self
            .loans
            .read()
            .unwrap()
            .values()
            .find(|l| l.is_active() && l.user_id == *user_id && l.book_id == *book_id)
            .cloned())
    }

    async fn list(
        &self,
        page: u64,
        limit: u64,
        filter: &LoanFilter,
    ) -> Result<(Vec<Loan>, u64), DomainError> {
        self.check()?;
        Ok(paginate(self.filtered(filter), page, limit))
    }

    async fn update(&self, loan: &Loan) -> Result<(), DomainError> {
        self.check()?;
        match self.loans.write().unwrap().get_mut(&loan.id) {
            Some(stored) => {
                *stored = loan.clone();
                Ok(())
            }
            None => Err(DomainError::LoanNotFound),
        }
    }

    async fn get_by_id_with_details(
        &self,
        id: &LoanId,
    ) -> Result<Option<LoanWithDetails>, DomainError> {
        self.check()?;
        let loan = self.loans.read().unwrap().get(id).cloned();
        Ok(loan.map(|l| self.enrich(l)))
    }

    async fn list_with_details(
        &self,
        page: u64,
        limit: u64,
        filter: &LoanFilter,
    ) -> Result<(Vec<LoanWithDetails>, u64), DomainError> {
        self.check()?;
        let (loans, total) = paginate(self.filtered(filter), page, limit);
        Ok((loans.into_iter().map(|l| self.enrich(l)).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_book, test_user};

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryUserRepository::new();
        let handle = repo.clone();
        let user = test_user();

        repo.create(&user).await.unwrap();

        assert!(handle.get_by_id(&user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn loan_details_fall_back_to_empty_strings() {
        let user = test_user();
        let book = test_book();
        let loan = Loan::new(user.id, book.id, None).unwrap();
        let repo = InMemoryLoanRepository::default().with_loan(loan.clone());

        let details = repo.get_by_id_with_details(&loan.id).await.unwrap().unwrap();

        assert_eq!(details.user_name, "");
        assert_eq!(details.book_title, "");
    }

    #[tokio::test]
    async fn paginate_reports_full_total() {
        let (items, total) = paginate((0..25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(items, (20..25).collect::<Vec<_>>());
        assert_eq!(total, 25);
    }
}
