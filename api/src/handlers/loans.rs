//! Loan handlers
//!
//! Endpoints for borrowing and returning books.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::BorrowBookInput;
use crate::domain::entities::{BookId, LoanId, LoanStatus, UserId};
use crate::domain::ports::{Claims, LoanFilter, LoanWithDetails};
use crate::error::AppError;
use crate::handlers::{json_body, parse_id, query_params, DataResponse, ListResponse};
use crate::AppState;

/// Query parameters for listing loans
#[derive(Debug, Default, Deserialize)]
pub struct ListLoansQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
    pub user_id: Option<String>,
    pub status: Option<String>,
}

impl ListLoansQuery {
    fn filter(&self) -> Result<LoanFilter, AppError> {
        let user_id = self
            .user_id
            .as_deref()
            .map(|raw| {
                Uuid::parse_str(raw)
                    .map(UserId)
                    .map_err(|_| AppError::BadRequest("invalid user_id format".to_string()))
            })
            .transpose()?;

        let status = self
            .status
            .as_deref()
            .map(|raw| raw.parse::<LoanStatus>().map_err(AppError::BadRequest))
            .transpose()?;

        Ok(LoanFilter { user_id, status })
    }
}

#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub book_id: String,
    pub book_title: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub is_overdue: bool,
}

impl From<LoanWithDetails> for LoanResponse {
    fn from(details: LoanWithDetails) -> Self {
        let LoanWithDetails {
            loan,
            user_name,
            book_title,
        } = details;

        Self {
            is_overdue: loan.is_overdue(),
            id: loan.id.to_string(),
            user_id: loan.user_id.to_string(),
            user_name,
            book_id: loan.book_id.to_string(),
            book_title,
            borrowed_at: loan.borrowed_at,
            due_date: loan.due_date,
            returned_at: loan.returned_at,
            status: loan.status,
        }
    }
}

/// Request to borrow a book
#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    pub user_id: Uuid,
    pub book_id: Uuid,
    /// RFC 3339; defaults to 14 days from now
    pub due_date: Option<DateTime<Utc>>,
}

/// GET /api/v1/loans
pub async fn list_loans(
    State(state): State<AppState>,
    query: Result<Query<ListLoansQuery>, QueryRejection>,
) -> Result<Json<ListResponse<LoanResponse>>, AppError> {
    let query = query_params(query)?;
    let filter = query.filter()?;

    let page = state
        .loan_service
        .list(query.page, query.limit, filter)
        .await?;

    Ok(ListResponse::from_page(page, LoanResponse::from))
}

/// POST /api/v1/loans
pub async fn create_loan(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateLoanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<LoanResponse>>), AppError> {
    let request = json_body(payload)?;

    let details = state
        .loan_service
        .borrow_book(BorrowBookInput {
            user_id: UserId(request.user_id),
            book_id: BookId(request.book_id),
            due_date: request.due_date,
        })
        .await?;

    tracing::info!(
        actor = %claims.user_id(),
        loan_id = %details.loan.id,
        borrower = %details.loan.user_id,
        "Loan created"
    );

    Ok((StatusCode::CREATED, DataResponse::new(details.into())))
}

/// GET /api/v1/loans/:id
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<LoanResponse>>, AppError> {
    let id = LoanId(parse_id(&id)?);

    let details = state.loan_service.get_by_id(&id).await?;

    Ok(DataResponse::new(details.into()))
}

/// POST /api/v1/loans/:id/return
pub async fn return_loan(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<LoanResponse>>, AppError> {
    let id = LoanId(parse_id(&id)?);

    let details = state.loan_service.return_book(&id).await?;
    tracing::info!(actor = %claims.user_id(), loan_id = %id, "Loan closed");

    Ok(DataResponse::new(details.into()))
}
