//! BookHub API Server
//!
//! A library lending service: users, a book catalog, and the borrow/return
//! workflow between them. Uses hexagonal (ports & adapters) architecture with
//! interchangeable PostgreSQL and MongoDB storage.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use mongodb::options::ClientOptions;
use sea_orm::{ConnectOptions, Database};
use serde::Serialize;
use tokio::signal;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    mongo, postgres, MongoBookRepository, MongoLoanRepository, MongoUserRepository,
    PostgresBookRepository, PostgresLoanRepository, PostgresUserRepository,
};
use app::{BookService, LoanService, UserService};
use auth::JwtService;
use config::{Config, DatabaseConfig, MongoConfig, StorageBackend};
use domain::ports::{BookRepository, LoanRepository, TokenIssuer, UserRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<dyn UserRepository>>,
    pub book_service: Arc<BookService<dyn BookRepository>>,
    pub loan_service: Arc<LoanService<dyn LoanRepository, dyn BookRepository, dyn UserRepository>>,
    pub tokens: Arc<dyn TokenIssuer>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        books: Arc<dyn BookRepository>,
        loans: Arc<dyn LoanRepository>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(users.clone())),
            book_service: Arc::new(BookService::new(books.clone())),
            loan_service: Arc::new(LoanService::new(loans, books, users)),
            tokens,
        }
    }
}

/// The three repositories of one storage backend
struct Repositories {
    users: Arc<dyn UserRepository>,
    books: Arc<dyn BookRepository>,
    loans: Arc<dyn LoanRepository>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router.
///
/// `rate_limit_login` enables per-IP throttling on the login route, which
/// needs the peer address from `into_make_service_with_connect_info`.
pub fn build_router(state: AppState, rate_limit_login: bool) -> Router {
    let mut login_routes = Router::new().route("/api/v1/auth/login", post(handlers::login));

    if rate_limit_login {
        // 2 req/sec sustained, burst of 5
        match GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
        {
            Some(config) => {
                login_routes = login_routes.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => tracing::warn!("Invalid rate limit quota, login is not throttled"),
        }
    }

    let protected_routes = Router::new()
        .route("/api/v1/users", get(handlers::list_users))
        .route(
            "/api/v1/users/:id",
            get(handlers::get_user).put(handlers::update_user),
        )
        .route("/api/v1/users/:id/disable", post(handlers::disable_user))
        .route(
            "/api/v1/books",
            get(handlers::list_books).post(handlers::create_book),
        )
        .route("/api/v1/books/:id", get(handlers::get_book))
        .route(
            "/api/v1/loans",
            get(handlers::list_loans).post(handlers::create_loan),
        )
        .route("/api/v1/loans/:id", get(handlers::get_loan))
        .route("/api/v1/loans/:id/return", post(handlers::return_loan))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Registration (no auth)
        .route("/api/v1/users", post(handlers::create_user))
        .merge(login_routes)
        .merge(protected_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn connect_postgres(config: &DatabaseConfig) -> anyhow::Result<Repositories> {
    tracing::info!("Connecting to PostgreSQL...");

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_open_conns)
        .min_connections(config.max_idle_conns)
        .max_lifetime(config.max_lifetime)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .context("failed to connect to PostgreSQL")?;
    postgres::ensure_schema(&db)
        .await
        .context("failed to create PostgreSQL schema")?;
    tracing::info!("PostgreSQL connected");

    Ok(Repositories {
        users: Arc::new(PostgresUserRepository::new(db.clone())),
        books: Arc::new(PostgresBookRepository::new(db.clone())),
        loans: Arc::new(PostgresLoanRepository::new(db)),
    })
}

async fn connect_mongo(config: &MongoConfig) -> anyhow::Result<Repositories> {
    tracing::info!("Connecting to MongoDB...");

    let mut options = ClientOptions::parse(&config.uri)
        .await
        .context("invalid MongoDB URI")?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.max_idle_time = Some(config.max_idle_time);

    let client = mongodb::Client::with_options(options).context("failed to build MongoDB client")?;
    let db = client.database(&config.database);
    mongo::ensure_indexes(&db)
        .await
        .context("failed to create MongoDB indexes")?;
    tracing::info!(database = %config.database, "MongoDB connected");

    Ok(Repositories {
        users: Arc::new(MongoUserRepository::new(&db)),
        books: Arc::new(MongoBookRepository::new(&db)),
        loans: Arc::new(MongoLoanRepository::new(&db)),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bookhub_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BookHub API...");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(backend = %config.storage_backend, "Configuration loaded");

    let repos = match config.storage_backend {
        StorageBackend::Postgres => connect_postgres(&config.database).await?,
        StorageBackend::Mongo => connect_mongo(&config.mongo).await?,
    };

    let tokens = Arc::new(JwtService::new(&config.jwt));
    let state = AppState::new(repos.users, repos.books, repos.loans, tokens);
    let app = build_router(state, true);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}
