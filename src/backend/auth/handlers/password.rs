/**
 * Password Reset Handlers
 *
 * POST /api/auth/forgot-password always answers 200. For a known account a
 * 30-minute reset token is issued. There is no mail delivery, so the token
 * is logged; it is returned in the body only when `expose_reset_tokens` is
 * enabled for local development.
 *
 * POST /api/auth/reset-password accepts that token and a new password. The
 * token is bound to the password hash it was issued against, so it stops
 * working as soon as the password changes, including through its own use.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{
    ForgotPasswordRequest, ForgotPasswordResponse, MessageResponse, ResetPasswordRequest,
};
use crate::backend::auth::users::{hash_password, normalize_email, validate_password};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists for this email, a password reset link has been sent.";

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, BackendError> {
    let email = normalize_email(&request.email);

    let reset_token = match state.users.get_user_by_email(&email).await? {
        Some(user) if user.is_active => {
            let token = state.sessions.issue_reset(&user)?;
            tracing::info!("Password reset token for {}: {}", user.email, token);
            state.expose_reset_tokens.then_some(token)
        }
        _ => {
            tracing::info!("Password reset requested for unknown email {}", email);
            None
        }
    };

    Ok(Json(ForgotPasswordResponse {
        message: FORGOT_PASSWORD_MESSAGE.to_string(),
        reset_token,
    }))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let claims = state.sessions.verify_reset(&request.token).map_err(|e| {
        tracing::warn!("Rejected reset token: {}", e);
        BackendError::from(e)
    })?;

    validate_password(&request.new_password)?;

    let user = state
        .users
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| BackendError::unauthorized("Invalid or expired token"))?;

    if !claims.matches_password(&user.password_hash) {
        tracing::warn!("Reset token for {} was issued for an older password", user.id);
        return Err(BackendError::unauthorized("Invalid or expired token"));
    }

    let password_hash = hash_password(request.new_password, state.bcrypt_cost).await?;
    state
        .users
        .update_password(&user.id, password_hash)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("Password reset for user {}", user.id);

    Ok(Json(MessageResponse::new("Password has been reset successfully")))
}
