//! Bearer token authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, AuthError};
use crate::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from the Authorization header
fn extract_bearer(request: &Request<Body>) -> Result<&str, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MalformedHeader)
}

/// Authentication middleware
///
/// Validates the bearer token and injects its `Claims` into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state.tokens.validate(extract_bearer(&request)?)?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        http::{HeaderValue, StatusCode},
        middleware,
        routing::get,
        Extension, Json, Router,
    };
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use super::*;
    use crate::auth::JwtService;
    use crate::config::JwtConfig;
    use crate::domain::entities::UserId;
    use crate::domain::ports::{Claims, TokenIssuer};
    use crate::test_utils::{
        InMemoryBookRepository, InMemoryLoanRepository, InMemoryUserRepository,
    };

    async fn whoami(Extension(claims): Extension<Claims>) -> Json<Value> {
        Json(json!({ "user_id": claims.user_id().to_string(), "email": claims.email }))
    }

    fn server() -> (TestServer, Arc<JwtService>) {
        let users = InMemoryUserRepository::new();
        let books = InMemoryBookRepository::new();
        let loans = InMemoryLoanRepository::new(users.clone(), books.clone());
        let tokens = Arc::new(JwtService::new(&JwtConfig {
            secret_key: "middleware-secret".to_string(),
            token_duration: std::time::Duration::from_secs(600),
            issuer: "bookhub-test".to_string(),
        }));
        let state = AppState::new(
            Arc::new(users),
            Arc::new(books),
            Arc::new(loans),
            tokens.clone(),
        );

        let router = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state);

        (TestServer::new(router).unwrap(), tokens)
    }

    #[tokio::test]
    async fn test_claims_reach_the_handler() {
        let (server, tokens) = server();
        let user_id = UserId::new();
        let token = tokens.issue(&user_id, "caller@example.com").unwrap().token;

        let response = server
            .get("/whoami")
            .add_header(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            )
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["user_id"], user_id.to_string());
        assert_eq!(body["email"], "caller@example.com");
    }

    #[tokio::test]
    async fn test_missing_header_never_reaches_the_handler() {
        let (server, _) = server();

        let response = server.get("/whoami").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let (server, _) = server();

        let response = server
            .get("/whoami")
            .add_header(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }
}
