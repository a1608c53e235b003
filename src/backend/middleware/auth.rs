/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require a
 * session. It verifies the bearer token from the Authorization header and
 * attaches an `AuthenticatedUser` to the request extensions.
 *
 * Handlers then pick one of two extractors:
 * - `AuthUser` accepts any session, anonymous included
 * - `FullUser` rejects anonymous sessions with 401
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Message returned when an anonymous session hits a mutating endpoint
pub const FULL_AUTH_REQUIRED: &str = "Full authentication required, anonymous access not allowed.";

/// Authenticated caller extracted from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
    pub anonymous: bool,
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(request: &Request) -> Result<&str, BackendError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::unauthorized("Missing authorization header")
        })?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            BackendError::unauthorized("Invalid authorization header")
        })
}

/// Authentication middleware
///
/// 1. Extracts the bearer token
/// 2. Verifies it as a session token
/// 3. For registered users, checks the account still exists and is active
/// 4. Attaches `AuthenticatedUser` to the request extensions
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(&request)?;

    let claims = app_state.sessions.verify_session(token).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        BackendError::from(e)
    })?;

    let anonymous = claims.is_anonymous();
    if !anonymous {
        let user = app_state.users.get_user_by_id(&claims.sub).await?;
        match user {
            Some(user) if user.is_active => {}
            Some(_) => {
                tracing::warn!("Inactive user {} presented a token", claims.sub);
                return Err(BackendError::unauthorized("Account is disabled"));
            }
            None => {
                tracing::warn!("Token for unknown user {}", claims.sub);
                return Err(BackendError::unauthorized("User not found"));
            }
        }
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        anonymous,
    });

    Ok(next.run(request).await)
}

fn authenticated_user(parts: &Parts) -> Result<AuthenticatedUser, BackendError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| {
            tracing::warn!("AuthenticatedUser not found in request extensions");
            BackendError::unauthorized("Authentication required")
        })
}

/// Any session, anonymous or full
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authenticated_user(parts).map(AuthUser)
    }
}

/// A registered, non-anonymous user
#[derive(Clone, Debug)]
pub struct FullUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for FullUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated_user(parts)?;
        if user.anonymous {
            tracing::warn!("Anonymous session {} rejected", user.user_id);
            return Err(BackendError::unauthorized(FULL_AUTH_REQUIRED));
        }
        Ok(FullUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let mut request = axum::http::Request::builder()
            .uri("http://example.com")
            .body(())
            .unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    fn anonymous() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "anon-1".to_string(),
            email: None,
            anonymous: true,
        }
    }

    #[tokio::test]
    async fn test_auth_user_accepts_anonymous() {
        let mut parts = parts_with(Some(anonymous()));
        let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(user.anonymous);
    }

    #[tokio::test]
    async fn test_full_user_rejects_anonymous() {
        let mut parts = parts_with(Some(anonymous()));
        let err = FullUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), FULL_AUTH_REQUIRED);
    }

    #[tokio::test]
    async fn test_missing_extension_is_unauthorized() {
        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
