//! User service
//!
//! Handles registration, profile updates, disabling, and credential checks.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::app::pagination::{Page, PageRequest};
use crate::domain::entities::{User, UserId};
use crate::domain::ports::UserRepository;
use crate::error::DomainError;

/// Input for registering a user
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Input for updating a user; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Service for managing users
pub struct UserService<UR>
where
    UR: UserRepository + ?Sized,
{
    users: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository + ?Sized,
{
    pub fn new(users: Arc<UR>) -> Self {
        Self { users }
    }

    /// Register a new user
    ///
    /// The email pre-check is best-effort: a storage error during the lookup
    /// is logged and treated as "no duplicate".
    pub async fn create(&self, input: CreateUserInput) -> Result<User, DomainError> {
        if self.email_taken(&input.email).await {
            return Err(DomainError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(&input.name, &input.email, &password_hash)?;

        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn get_by_id(&self, id: &UserId) -> Result<User, DomainError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, DomainError> {
        self.users
            .get_by_email(email)
            .await?
            .ok_or(DomainError::UserNotFound)
    }

    /// List users, newest first
    pub async fn list(&self, page: i64, limit: i64) -> Result<Page<User>, DomainError> {
        let request = PageRequest::clamped(page, limit);
        let (users, total) = self.users.list(request.page, request.limit).await?;
        Ok(Page::new(users, request, total))
    }

    /// Update name and/or email
    ///
    /// Uniqueness is re-checked only when the email actually changes.
    pub async fn update(&self, id: &UserId, input: UpdateUserInput) -> Result<User, DomainError> {
        let mut user = self.get_by_id(id).await?;

        if let Some(email) = input.email.as_deref() {
            if email != user.email && self.email_taken(email).await {
                return Err(DomainError::EmailAlreadyExists);
            }
        }

        user.update(
            input.name.as_deref().unwrap_or_default(),
            input.email.as_deref().unwrap_or_default(),
        )?;

        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Disable a user. Fails if the user is already disabled.
    pub async fn disable(&self, id: &UserId) -> Result<(), DomainError> {
        let mut user = self.get_by_id(id).await?;

        user.disable()?;
        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, "User disabled");
        Ok(())
    }

    /// Check an email/password pair
    ///
    /// A wrong password is reported as `UserNotFound` so callers cannot tell
    /// which half of the pair was wrong.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let user = self.get_by_email(email).await?;

        if !user.is_active() {
            return Err(DomainError::UserDisabled);
        }

        if !verify_password(password, &user.password_hash) {
            return Err(DomainError::UserNotFound);
        }

        Ok(user)
    }

    async fn email_taken(&self, email: &str) -> bool {
        match self.users.get_by_email(email).await {
            Ok(existing) => existing.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "Email uniqueness check failed, assuming no duplicate");
                false
            }
        }
    }
}

/// Hash a plaintext password with Argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::Internal(format!("password hashing failed: {}", e)))
}

/// Constant-time check of a plaintext password against a stored hash.
/// An unparseable hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
