//! Document models
//!
//! Field names are lower-case without separators, ids are stored as UUID
//! binaries under `id` and timestamps as BSON dates.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, Bson};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Book, BookId, Loan, LoanId, LoanStatus, User, UserId};
use crate::error::DomainError;

pub(crate) fn to_bson_uuid(id: uuid::Uuid) -> bson::Uuid {
    bson::Uuid::from_bytes(*id.as_bytes())
}

fn from_bson_uuid(id: bson::Uuid) -> uuid::Uuid {
    uuid::Uuid::from_bytes(id.bytes())
}

fn to_bson_date(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_date(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

/// Filter value for an `id` field
pub(crate) fn id_value(id: uuid::Uuid) -> Bson {
    Bson::from(to_bson_uuid(id))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    pub id: bson::Uuid,
    pub name: String,
    pub email: String,
    pub passwordhash: String,
    pub active: bool,
    pub createdat: bson::DateTime,
    pub updatedat: bson::DateTime,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: to_bson_uuid(user.id.0),
            name: user.name.clone(),
            email: user.email.clone(),
            passwordhash: user.password_hash.clone(),
            active: user.active,
            createdat: to_bson_date(user.created_at),
            updatedat: to_bson_date(user.updated_at),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: UserId(from_bson_uuid(doc.id)),
            name: doc.name,
            email: doc.email,
            password_hash: doc.passwordhash,
            active: doc.active,
            created_at: from_bson_date(doc.createdat),
            updated_at: from_bson_date(doc.updatedat),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDocument {
    pub id: bson::Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publishedyear: i32,
    pub totalcopies: i32,
    pub availablecopies: i32,
    pub createdat: bson::DateTime,
    pub updatedat: bson::DateTime,
}

impl From<&Book> for BookDocument {
    fn from(book: &Book) -> Self {
        Self {
            id: to_bson_uuid(book.id.0),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            publishedyear: book.published_year,
            totalcopies: book.total_copies,
            availablecopies: book.available_copies,
            createdat: to_bson_date(book.created_at),
            updatedat: to_bson_date(book.updated_at),
        }
    }
}

impl From<BookDocument> for Book {
    fn from(doc: BookDocument) -> Self {
        Book {
            id: BookId(from_bson_uuid(doc.id)),
            title: doc.title,
            author: doc.author,
            isbn: doc.isbn,
            published_year: doc.publishedyear,
            total_copies: doc.totalcopies,
            available_copies: doc.availablecopies,
            created_at: from_bson_date(doc.createdat),
            updated_at: from_bson_date(doc.updatedat),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanDocument {
    pub id: bson::Uuid,
    pub userid: bson::Uuid,
    pub bookid: bson::Uuid,
    pub borrowedat: bson::DateTime,
    pub duedate: bson::DateTime,
    pub returnedat: Option<bson::DateTime>,
    pub status: String,
}

impl From<&Loan> for LoanDocument {
    fn from(loan: &Loan) -> Self {
        Self {
            id: to_bson_uuid(loan.id.0),
            userid: to_bson_uuid(loan.user_id.0),
            bookid: to_bson_uuid(loan.book_id.0),
            borrowedat: to_bson_date(loan.borrowed_at),
            duedate: to_bson_date(loan.due_date),
            returnedat: loan.returned_at.map(to_bson_date),
            status: loan.status.to_string(),
        }
    }
}

impl TryFrom<LoanDocument> for Loan {
    type Error = DomainError;

    fn try_from(doc: LoanDocument) -> Result<Self, Self::Error> {
        let id = from_bson_uuid(doc.id);
        let status = doc
            .status
            .parse::<LoanStatus>()
            .map_err(|e| DomainError::Database(format!("loan {}: {}", id, e)))?;

        Ok(Loan {
            id: LoanId(id),
            user_id: UserId(from_bson_uuid(doc.userid)),
            book_id: BookId(from_bson_uuid(doc.bookid)),
            borrowed_at: from_bson_date(doc.borrowedat),
            due_date: from_bson_date(doc.duedate),
            returned_at: doc.returnedat.map(from_bson_date),
            status,
        })
    }
}
