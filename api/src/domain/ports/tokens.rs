//! Token issuer port
//!
//! Login hands a verified user to a `TokenIssuer`; the bearer middleware
//! validates incoming tokens through the same trait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::UserId;
use crate::error::AuthError;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> UserId {
        UserId(self.sub)
    }
}

/// A freshly signed token and its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub trait TokenIssuer: Send + Sync {
    /// Sign a token for the given user
    fn issue(&self, user_id: &UserId, email: &str) -> Result<IssuedToken, AuthError>;

    /// Verify signature, issuer and expiry, returning the claims
    fn validate(&self, token: &str) -> Result<Claims, AuthError>;
}
