//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod repositories;
pub mod tokens;

pub use repositories::{
    page_offset, BookRepository, LoanFilter, LoanRepository, LoanWithDetails, UserRepository,
};
pub use tokens::{Claims, IssuedToken, TokenIssuer};
