/**
 * Server Initialization
 *
 * Builds the application from a `ServerConfig`:
 * 1. Open the configured storage backend
 * 2. Build the generation client (optional)
 * 3. Create session keys and `AppState`
 * 4. Create the router
 *
 * Without a Gemini API key the server still starts and the generation
 * endpoints answer 503. A key that is set but empty or the placeholder
 * value is a misconfiguration and fails startup.
 */

use axum::Router;
use thiserror::Error;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::generation::{GenerationClient, InvalidApiKeyError};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;
use crate::backend::storage::{self, StorageError};

/// Startup failures
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    InvalidApiKey(#[from] InvalidApiKeyError),
}

/// Build the generation client
///
/// `Ok(None)` when no key is configured.
pub fn load_generator(config: &ServerConfig) -> Result<Option<GenerationClient>, InvalidApiKeyError> {
    let Some(settings) = config.gemini.clone() else {
        return Ok(None);
    };
    GenerationClient::gemini(settings, config.retry.clone())
        .map(Some)
        .map_err(|e| {
            tracing::error!("{}", e);
            e
        })
}

/// Assemble `AppState` from configuration
pub async fn create_state(config: &ServerConfig) -> Result<AppState, InitError> {
    let generator = load_generator(config)?;
    let stores = storage::open(&config.storage).await?;
    let sessions = SessionKeys::new(&config.jwt_secret);

    Ok(AppState::new(stores, generator, sessions)
        .with_bcrypt_cost(config.bcrypt_cost)
        .with_reset_token_exposure(config.expose_reset_tokens))
}

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, InitError> {
    tracing::info!("Initializing blog backend");

    let app_state = create_state(config).await?;
    let app = create_router(app_state, &config.cors_origins);

    tracing::info!("Router configured");
    Ok(app)
}
