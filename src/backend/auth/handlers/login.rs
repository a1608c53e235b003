/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * Unknown email, wrong password and disabled account all return the same
 * 401 so callers cannot probe which emails are registered.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::users::{normalize_email, verify_password};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let email = normalize_email(&request.email);
    tracing::info!("Login request for: {}", email);

    let user = state
        .users
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", email);
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    let valid = verify_password(request.password, user.password_hash.clone()).await?;
    if !valid || !user.is_active {
        tracing::warn!("Rejected login for user: {}", email);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.sessions.issue_session(&user)?;

    tracing::info!("User logged in successfully: {}", user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
