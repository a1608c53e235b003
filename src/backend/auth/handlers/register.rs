/**
 * Register Handler
 *
 * POST /api/auth/register
 *
 * 1. Validate email shape and password length
 * 2. Hash the password with bcrypt
 * 3. Create the user (409 when the email is taken)
 * 4. Return a session token and the user
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::users::{
    hash_password, normalize_email, validate_email, validate_password, NewUser,
};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    let email = normalize_email(&request.email);
    tracing::info!("Register request for: {}", email);

    let password_hash = hash_password(request.password, state.bcrypt_cost).await?;

    let display_name = request
        .display_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let user = state
        .users
        .create_user(NewUser {
            email,
            display_name,
            password_hash,
        })
        .await
        .map_err(|e| {
            tracing::warn!("Failed to create user: {}", e);
            e
        })?;

    let token = state.sessions.issue_session(&user)?;

    tracing::info!("User registered: {} ({})", user.email, user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}
