//! HS256 access tokens

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::config::JwtConfig;
use crate::domain::entities::UserId;
use crate::domain::ports::{Claims, IssuedToken, TokenIssuer};
use crate::error::AuthError;

/// Signs and validates JWTs with a shared secret
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    token_duration: Duration,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret_key.as_bytes()),
            issuer: config.issuer.clone(),
            token_duration: Duration::from_std(config.token_duration)
                .unwrap_or_else(|_| Duration::hours(24)),
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;
        validation
    }
}

impl TokenIssuer for JwtService {
    fn issue(&self, user_id: &UserId, email: &str) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.token_duration)
            .ok_or_else(|| AuthError::Signing("token expiry out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.0,
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_at,
        })
    }

    fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret_key: secret.to_string(),
            token_duration: std::time::Duration::from_secs(3600),
            issuer: "bookhub".to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let service = JwtService::new(&config("test-secret"));
        let user_id = UserId::new();

        let issued = service.issue(&user_id, "reader@example.com").unwrap();
        let claims = service.validate(&issued.token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.email, "reader@example.com");
        assert_eq!(claims.iss, "bookhub");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert!(issued.expires_at > Utc::now());
    }

    #[test]
    fn test_out_of_range_duration_fails_to_issue() {
        let service = JwtService::new(&JwtConfig {
            token_duration: std::time::Duration::from_secs(9_000_000_000_000_000),
            ..config("test-secret")
        });

        let result = service.issue(&UserId::new(), "reader@example.com");

        assert!(matches!(result, Err(AuthError::Signing(_))));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = JwtService::new(&config("secret-a"));
        let verifier = JwtService::new(&config("secret-b"));

        let issued = issuer.issue(&UserId::new(), "reader@example.com").unwrap();

        assert!(matches!(
            verifier.validate(&issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(&config("test-secret"));
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: UserId::new().0,
            email: "reader@example.com".to_string(),
            iss: "bookhub".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::hours(1)).timestamp(),
        };
        let token = service.sign(&claims).unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let service = JwtService::new(&config("test-secret"));
        let claims = Claims {
            sub: UserId::new().0,
            email: "reader@example.com".to_string(),
            iss: "someone-else".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = service.sign(&claims).unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token() {
        let service = JwtService::new(&config("test-secret"));
        assert!(matches!(
            service.validate("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
