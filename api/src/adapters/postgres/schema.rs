//! Schema bootstrap
//!
//! Creates the tables and indexes if they do not exist yet. Safe to run on
//! every startup.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";
pub(crate) const BOOKS_ISBN_KEY: &str = "books_isbn_key";
pub(crate) const BOOKS_COPIES_CHECK: &str = "books_available_copies_check";
pub(crate) const LOANS_ACTIVE_PAIR_INDEX: &str = "loans_active_user_book_idx";

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT users_email_key UNIQUE (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id UUID PRIMARY KEY,
        title VARCHAR(200) NOT NULL,
        author VARCHAR(100) NOT NULL,
        isbn VARCHAR(13) NOT NULL,
        published_year INTEGER,
        total_copies INTEGER NOT NULL,
        available_copies INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT books_isbn_key UNIQUE (isbn),
        CONSTRAINT books_available_copies_check
            CHECK (available_copies >= 0 AND available_copies <= total_copies)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS loans (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users (id),
        book_id UUID NOT NULL REFERENCES books (id),
        borrowed_at TIMESTAMPTZ NOT NULL,
        due_date TIMESTAMPTZ NOT NULL,
        returned_at TIMESTAMPTZ,
        status VARCHAR(20) NOT NULL DEFAULT 'active'
    )
    "#,
    "CREATE INDEX IF NOT EXISTS loans_user_id_idx ON loans (user_id)",
    "CREATE INDEX IF NOT EXISTS loans_book_id_idx ON loans (book_id)",
    "CREATE INDEX IF NOT EXISTS loans_status_idx ON loans (status)",
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS loans_active_user_book_idx
        ON loans (user_id, book_id) WHERE status = 'active'
    "#,
];

/// Create the `users`, `books` and `loans` tables with their constraints
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    for statement in STATEMENTS {
        db.execute_unprepared(statement).await?;
    }

    tracing::info!("PostgreSQL schema ready");
    Ok(())
}
