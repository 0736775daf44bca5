//! Authentication: token signing and the bearer guard

pub mod jwt;
pub mod middleware;

pub use jwt::JwtService;
pub use middleware::auth_middleware;
