/**
 * Current User and Anonymous Sign-In Handlers
 *
 * GET /api/auth/me returns the caller behind the bearer token (verified by
 * `auth_middleware`). POST /api/auth/anonymous hands out an anonymous
 * session that may preview generations but not modify posts.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, UserResponse};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<UserResponse>, BackendError> {
    if caller.anonymous {
        return Ok(Json(UserResponse::anonymous(caller.user_id)));
    }

    let user = state
        .users
        .get_user_by_id(&caller.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

pub async fn anonymous(State(state): State<AppState>) -> Result<Json<AuthResponse>, BackendError> {
    let (token, id) = state.sessions.issue_anonymous()?;
    tracing::info!("Issued anonymous session {}", id);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::anonymous(id),
    }))
}
