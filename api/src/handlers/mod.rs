//! HTTP handlers
//!
//! Axum request handlers for the API endpoints, plus the response envelopes
//! they share: `{"data": ...}` for single results and
//! `{"data": [...], "pagination": {...}}` for listings.

pub mod auth;
pub mod books;
pub mod loans;
pub mod users;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Json, Query},
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::Page;
use crate::error::AppError;

pub use auth::login;
pub use books::{create_book, get_book, list_books};
pub use loans::{create_loan, get_loan, list_loans, return_loan};
pub use users::{create_user, disable_user, get_user, list_users, update_user};

/// Single-resource envelope
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationResponse {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Listing envelope
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationResponse,
}

impl<T> ListResponse<T> {
    pub fn from_page<U>(page: Page<U>, to_response: impl FnMut(U) -> T) -> Json<Self> {
        let pagination = PaginationResponse {
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages(),
        };

        Json(Self {
            data: page.items.into_iter().map(to_response).collect(),
            pagination,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Parse a path id, reporting malformed input as a bad request
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("invalid id format".to_string()))
}

/// Unwrap a JSON body, reporting any rejection as a bad request
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        AppError::BadRequest("invalid request body".to_string())
    })
}

/// Unwrap query parameters, reporting any rejection as a bad request
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query.map(|Query(params)| params).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected query string");
        AppError::BadRequest("invalid query parameters".to_string())
    })
}
