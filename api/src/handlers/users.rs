//! User handlers
//!
//! Endpoints for registering and managing library users.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::{CreateUserInput, UpdateUserInput};
use crate::domain::entities::{User, UserId};
use crate::domain::ports::Claims;
use crate::error::AppError;
use crate::handlers::{
    json_body, parse_id, query_params, DataResponse, ListResponse, MessageResponse,
};
use crate::AppState;

/// Query parameters for listing users
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
}

/// Public view of a user; the password hash never leaves the service
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request to register a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to update a user; omitted fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<ListResponse<UserResponse>>, AppError> {
    let query = query_params(query)?;

    let page = state.user_service.list(query.page, query.limit).await?;

    Ok(ListResponse::from_page(page, UserResponse::from))
}

/// POST /api/v1/users
///
/// Public: registration does not require a token.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<UserResponse>>), AppError> {
    let request = json_body(payload)?;

    let user = state
        .user_service
        .create(CreateUserInput {
            name: request.name,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok((StatusCode::CREATED, DataResponse::new(user.into())))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<UserResponse>>, AppError> {
    let id = UserId(parse_id(&id)?);

    let user = state.user_service.get_by_id(&id).await?;

    Ok(DataResponse::new(user.into()))
}

/// PUT /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<DataResponse<UserResponse>>, AppError> {
    let id = UserId(parse_id(&id)?);
    let request = json_body(payload)?;

    let user = state
        .user_service
        .update(
            &id,
            UpdateUserInput {
                name: request.name,
                email: request.email,
            },
        )
        .await?;

    tracing::info!(actor = %claims.user_id(), user_id = %id, "User profile changed");

    Ok(DataResponse::new(user.into()))
}

/// POST /api/v1/users/:id/disable
pub async fn disable_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = UserId(parse_id(&id)?);

    state.user_service.disable(&id).await?;
    tracing::info!(actor = %claims.user_id(), user_id = %id, "User disabled by caller");

    Ok(Json(MessageResponse {
        message: "user disabled successfully",
    }))
}
