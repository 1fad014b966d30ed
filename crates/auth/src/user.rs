//! User entity and registration input.

use chrono::{DateTime, Utc};
use serde::Serialize;

use souk_core::{DomainError, DomainResult, UserId};

use crate::Role;

/// A registered account.
///
/// `password_hash` is the PHC-format Argon2 hash; the plaintext never leaves
/// the registration/login handlers.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated registration input, ready for persistence.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl NewUser {
    /// Validate raw registration fields.
    ///
    /// The caller hashes the password separately; this only checks the
    /// identity fields.
    pub fn validate(name: &str, email: &str, password: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(DomainError::validation("a valid email is required"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password is required"));
        }
        Ok(())
    }
}
