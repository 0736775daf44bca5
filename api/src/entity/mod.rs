//! SeaORM entity models
//!
//! One module per table. Conversions to domain entities live in the
//! PostgreSQL adapters.

pub mod books;
pub mod loans;
pub mod users;
