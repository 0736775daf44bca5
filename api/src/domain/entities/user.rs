//! User domain entity
//!
//! A library member who can borrow books and log in to the API.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 100;
const PASSWORD_HASH_MIN_LEN: usize = 6;

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered library user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Already-hashed password; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new active user, validating name, email and password hash in that order.
    pub fn new(name: &str, email: &str, password_hash: &str) -> Result<Self, DomainError> {
        let now = Utc::now();
        let user = Self {
            id: UserId::new(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        };

        user.validate()?;
        Ok(user)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !is_valid_name(&self.name) {
            return Err(DomainError::InvalidUserName);
        }

        if !is_valid_email(&self.email) {
            return Err(DomainError::InvalidUserEmail);
        }

        // Length of the stored hash, not the plaintext
        if self.password_hash.chars().count() < PASSWORD_HASH_MIN_LEN {
            return Err(DomainError::InvalidUserPassword);
        }

        Ok(())
    }

    /// Update name and/or email. An empty string leaves that field unchanged.
    pub fn update(&mut self, name: &str, email: &str) -> Result<(), DomainError> {
        if !name.is_empty() {
            if !is_valid_name(name) {
                return Err(DomainError::InvalidUserName);
            }
            self.name = name.to_string();
        }

        if !email.is_empty() {
            if !is_valid_email(email) {
                return Err(DomainError::InvalidUserEmail);
            }
            self.email = email.to_string();
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// One-way transition to inactive
    pub fn disable(&mut self) -> Result<(), DomainError> {
        if !self.active {
            return Err(DomainError::UserAlreadyDisabled);
        }
        self.active = false;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len)
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern compiles")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}
