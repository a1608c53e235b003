/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Handler errors occur when processing HTTP requests:
 * - Missing or invalid bearer tokens
 * - Requests for posts that do not exist
 * - Mutations by someone other than the author
 *
 * ## Domain Errors
 *
 * Wrapped errors from the layers below the handlers: input validation
 * (`SharedError`), persistence (`StorageError`), token handling
 * (`SessionError`) and the generation pipeline (`GenerationError`).
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::sessions::SessionError;
use crate::backend::generation::GenerationError;
use crate::backend::storage::StorageError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// Each variant maps to a status code and can be returned directly from a
/// handler.
///
/// ```rust
/// use axum::http::StatusCode;
/// use blogsmith::backend::error::BackendError;
///
/// let err = BackendError::handler(StatusCode::NOT_FOUND, "Post not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., missing token, unknown post)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// A required service is not configured or failed internally
    #[error("State error: {message}")]
    StateError {
        /// Human-readable error message
        message: String,
    },

    /// Validation or serialization error from the shared types
    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error(transparent)]
    StorageError(#[from] StorageError),

    #[error(transparent)]
    SessionError(#[from] SessionError),

    /// Terminal failure of a generation operation
    #[error(transparent)]
    GenerationError(#[from] GenerationError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `StateError` - 503 Service Unavailable
    /// - `SharedError` - 422 for validation, 500 for serialization
    /// - `StorageError` - 409 for conflicts, 500 otherwise
    /// - `SessionError` - 401 Unauthorized
    /// - `GenerationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::StateError { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::StorageError(StorageError::Conflict(_)) => StatusCode::CONFLICT,
            Self::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SessionError(_) => StatusCode::UNAUTHORIZED,
            Self::GenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::StateError { message } => message.clone(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::StorageError(StorageError::Conflict(message)) => message.clone(),
            Self::StorageError(err) => err.to_string(),
            Self::SessionError(_) => "Invalid or expired token".to_string(),
            Self::GenerationError(err) => err.message().to_string(),
        }
    }
}
