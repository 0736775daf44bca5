//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod mongo;
pub mod postgres;

pub use mongo::{MongoBookRepository, MongoLoanRepository, MongoUserRepository};
pub use postgres::{PostgresBookRepository, PostgresLoanRepository, PostgresUserRepository};
