/**
 * Authentication Handler Types
 *
 * Request and response bodies for the `/api/auth` handlers.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    /// Plain password, hashed before storage
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by register, login and anonymous sign-in
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// JWT session token (30-day expiration)
    pub token: String,
    pub user: UserResponse,
}

/// User information that is safe to return to clients
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
}

impl UserResponse {
    pub fn anonymous(id: String) -> Self {
        Self {
            id,
            email: None,
            display_name: None,
            role: None,
            anonymous: true,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: Some(user.email),
            display_name: user.display_name,
            role: Some(user.role),
            anonymous: false,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Always returned by forgot-password, whether or not the email is known
#[derive(Serialize, Deserialize, Debug)]
pub struct ForgotPasswordResponse {
    pub message: String,
    /// Present only for a known account with reset token exposure enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
