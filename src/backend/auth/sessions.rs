/**
 * Session Management and JWT Tokens
 *
 * This module issues and verifies the HS256 tokens used for sessions and
 * password resets. A token's `purpose` claim decides where it is accepted:
 * session tokens authenticate requests, reset tokens only unlock
 * `/api/auth/reset-password`.
 *
 * Reset tokens also carry a fingerprint of the password hash they were
 * issued against. Any password change invalidates every earlier reset
 * token, including the one that made the change.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::User;

/// Session lifetime
pub const SESSION_TTL_DAYS: i64 = 30;

/// Password reset token lifetime
pub const RESET_TTL_MINUTES: i64 = 30;

pub const PROVIDER_PASSWORD: &str = "password";
pub const PROVIDER_ANONYMOUS: &str = "anonymous";

pub const PURPOSE_SESSION: &str = "session";
pub const PURPOSE_RESET: &str = "reset";

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (random for anonymous sessions)
    pub sub: String,
    /// Email, absent for anonymous sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Sign-in provider (`password` or `anonymous`)
    pub provider: String,
    /// `session` or `reset`
    pub purpose: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Password hash fingerprint, reset tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwd: Option<String>,
}

impl Claims {
    pub fn is_anonymous(&self) -> bool {
        self.provider == PROVIDER_ANONYMOUS
    }

    /// Whether this reset token was issued against `password_hash`
    pub fn matches_password(&self, password_hash: &str) -> bool {
        self.pwd.as_deref() == Some(password_fingerprint(password_hash))
    }
}

/// The salt segment of a bcrypt hash (`$2b$12$<22-char salt><hash>`)
///
/// Every new hash gets a fresh salt, so this changes whenever the password
/// is set. The digest itself never leaves the server.
pub fn password_fingerprint(password_hash: &str) -> &str {
    password_hash.get(7..29).unwrap_or_default()
}

/// Token issuing and verification failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token is not valid for {expected}")]
    WrongPurpose { expected: &'static str },
}

/// Signing keys plus token lifetimes
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    session_ttl: Duration,
    reset_ttl: Duration,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("session_ttl", &self.session_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl: Duration::days(SESSION_TTL_DAYS),
            reset_ttl: Duration::minutes(RESET_TTL_MINUTES),
        }
    }

    fn sign(
        &self,
        sub: String,
        email: Option<String>,
        provider: &str,
        purpose: &str,
        ttl: Duration,
        pwd: Option<String>,
    ) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = Claims {
            sub,
            email,
            provider: provider.to_string(),
            purpose: purpose.to_string(),
            exp: (now + ttl).timestamp().max(0) as u64,
            iat: now.timestamp().max(0) as u64,
            pwd,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// 30-day session for a registered user
    pub fn issue_session(&self, user: &User) -> Result<String, SessionError> {
        self.sign(
            user.id.clone(),
            Some(user.email.clone()),
            PROVIDER_PASSWORD,
            PURPOSE_SESSION,
            self.session_ttl,
            None,
        )
    }

    /// Anonymous session with a fresh random subject; returns `(token, subject)`
    pub fn issue_anonymous(&self) -> Result<(String, String), SessionError> {
        let sub = Uuid::new_v4().to_string();
        let token = self.sign(
            sub.clone(),
            None,
            PROVIDER_ANONYMOUS,
            PURPOSE_SESSION,
            self.session_ttl,
            None,
        )?;
        Ok((token, sub))
    }

    /// Short-lived password reset token
    pub fn issue_reset(&self, user: &User) -> Result<String, SessionError> {
        self.sign(
            user.id.clone(),
            Some(user.email.clone()),
            PROVIDER_PASSWORD,
            PURPOSE_RESET,
            self.reset_ttl,
            Some(password_fingerprint(&user.password_hash).to_string()),
        )
    }

    fn verify(&self, token: &str, purpose: &'static str) -> Result<Claims, SessionError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        if data.claims.purpose != purpose {
            return Err(SessionError::WrongPurpose { expected: purpose });
        }
        Ok(data.claims)
    }

    pub fn verify_session(&self, token: &str) -> Result<Claims, SessionError> {
        self.verify(token, PURPOSE_SESSION)
    }

    pub fn verify_reset(&self, token: &str) -> Result<Claims, SessionError> {
        self.verify(token, PURPOSE_RESET)
    }
}
