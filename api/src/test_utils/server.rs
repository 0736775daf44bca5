//! Router harness for handler tests

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum_test::{TestRequest, TestServer};

use super::mocks::{InMemoryBookRepository, InMemoryLoanRepository, InMemoryUserRepository};
use crate::auth::JwtService;
use crate::config::JwtConfig;
use crate::domain::entities::UserId;
use crate::domain::ports::TokenIssuer;
use crate::{build_router, AppState};

/// The full router over in-memory repositories, plus a valid bearer token.
///
/// The repositories share storage with the ones inside the router, so tests
/// can seed data directly and observe what handlers wrote.
pub struct TestApp {
    pub server: TestServer,
    pub users: InMemoryUserRepository,
    pub books: InMemoryBookRepository,
    pub loans: InMemoryLoanRepository,
    pub tokens: Arc<JwtService>,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let users = InMemoryUserRepository::new();
        let books = InMemoryBookRepository::new();
        let loans = InMemoryLoanRepository::new(users.clone(), books.clone());
        let tokens = Arc::new(JwtService::new(&JwtConfig {
            secret_key: "test-secret".to_string(),
            token_duration: std::time::Duration::from_secs(3600),
            issuer: "bookhub-test".to_string(),
        }));

        let state = AppState::new(
            Arc::new(users.clone()),
            Arc::new(books.clone()),
            Arc::new(loans.clone()),
            tokens.clone(),
        );
        let server = TestServer::new(build_router(state, false)).unwrap();
        let token = tokens
            .issue(&UserId::new(), "tester@example.com")
            .unwrap()
            .token;

        Self {
            server,
            users,
            books,
            loans,
            tokens,
            token,
        }
    }

    /// Attach the harness token as a bearer credential
    pub fn authed(&self, request: TestRequest) -> TestRequest {
        self.with_header(request, &format!("Bearer {}", self.token))
    }

    /// Attach an arbitrary Authorization header
    pub fn with_header(&self, request: TestRequest, value: &str) -> TestRequest {
        request.add_header(AUTHORIZATION, HeaderValue::from_str(value).unwrap())
    }
}
