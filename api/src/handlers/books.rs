//! Book handlers
//!
//! Endpoints for the book catalog.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::CreateBookInput;
use crate::domain::entities::{Book, BookId};
use crate::domain::ports::Claims;
use crate::error::AppError;
use crate::handlers::{json_body, parse_id, query_params, DataResponse, ListResponse};
use crate::AppState;

/// Query parameters for listing books
#[derive(Debug, Default, Deserialize)]
pub struct ListBooksQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
    /// Only books with at least one free copy
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
    pub total_copies: i32,
    pub available_copies: i32,
    pub availability_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            availability_status: book.availability().to_string(),
            id: book.id.to_string(),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            published_year: book.published_year,
            total_copies: book.total_copies,
            available_copies: book.available_copies,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

/// Request to add a book
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default)]
    pub published_year: i32,
    pub total_copies: i32,
}

/// GET /api/v1/books
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<ListBooksQuery>, QueryRejection>,
) -> Result<Json<ListResponse<BookResponse>>, AppError> {
    let query = query_params(query)?;

    let page = state
        .book_service
        .list(query.page, query.limit, query.available)
        .await?;

    Ok(ListResponse::from_page(page, BookResponse::from))
}

/// POST /api/v1/books
pub async fn create_book(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<BookResponse>>), AppError> {
    let request = json_body(payload)?;

    let book = state
        .book_service
        .create(CreateBookInput {
            title: request.title,
            author: request.author,
            isbn: request.isbn,
            published_year: request.published_year,
            total_copies: request.total_copies,
        })
        .await?;

    tracing::info!(actor = %claims.user_id(), book_id = %book.id, "Book added to catalog");

    Ok((StatusCode::CREATED, DataResponse::new(book.into())))
}

/// GET /api/v1/books/:id
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<BookResponse>>, AppError> {
    let id = BookId(parse_id(&id)?);

    let book = state.book_service.get_by_id(&id).await?;

    Ok(DataResponse::new(book.into()))
}
