/**
 * User Model
 *
 * This module defines the stored user record and the input validation
 * applied at registration and password reset. Persistence lives behind
 * `storage::UserStore`.
 */

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::shared::SharedError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// User record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (server-assigned)
    pub id: String,
    /// User email address (unique, lowercase)
    pub email: String,
    /// Optional display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Role (user, admin)
    #[serde(default = "default_role")]
    pub role: String,
    /// Disabled accounts cannot log in
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

fn default_role() -> String {
    "user".to_string()
}

fn default_active() -> bool {
    true
}

/// Input for creating a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
}

impl User {
    /// Materialize a new user with a server-assigned id
    pub fn from_new(id: String, new: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: new.email,
            display_name: new.display_name,
            password_hash: new.password_hash,
            role: default_role(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lowercase and trim an email for lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email shape check
pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(SharedError::validation("email", "Invalid email format")),
    }
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// Hash a password with bcrypt off the async runtime
pub async fn hash_password(password: String, cost: u32) -> Result<String, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
        })?
        .map_err(|e| {
            tracing::error!("Password hashing error: {:?}", e);
            BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
        })
}

/// Check a password against a stored bcrypt hash
pub async fn verify_password(password: String, hash: String) -> Result<bool, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {}", e);
            BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Failed to verify password")
        })?
        .map_err(|e| {
            tracing::error!("Password verification error: {:?}", e);
            BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Failed to verify password")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("password123").is_ok());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn test_from_new_defaults() {
        let now = Utc::now();
        let user = User::from_new(
            "u-1".to_string(),
            NewUser {
                email: "a@b.c".to_string(),
                display_name: None,
                password_hash: "hash".to_string(),
            },
            now,
        );
        assert_eq!(user.role, "user");
        assert!(user.is_active);
        assert_eq!(user.created_at, now);
    }

    #[tokio::test]
    async fn test_hash_and_verify_password() {
        let hash = hash_password("password123".to_string(), 4).await.unwrap();
        assert!(verify_password("password123".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrongpassword".to_string(), hash).await.unwrap());
    }
}
