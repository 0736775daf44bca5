//! Login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::handlers::json_body;
use crate::handlers::users::UserResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// POST /api/v1/auth/login
///
/// Every credential failure is reported the same way.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let request = json_body(payload)?;

    let user = state
        .user_service
        .validate_credentials(&request.email, &request.password)
        .await
        .map_err(|e| {
            tracing::warn!(email = %request.email, error = %e, "Login failed");
            AppError::Unauthorized("invalid credentials".to_string())
        })?;

    let issued = state.tokens.issue(&user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: user.into(),
    }))
}
