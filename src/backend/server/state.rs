/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container, holding:
 * - Post and user storage (`Arc<dyn PostStore>`, `Arc<dyn UserStore>`)
 * - The generation client, if one is configured
 * - Session signing keys
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow handlers to extract only the part
 * of the state they use, e.g. `State(posts): State<Arc<dyn PostStore>>`.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::generation::GenerationClient;
use crate::backend::storage::{PostStore, Stores, UserStore};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Post persistence
    pub posts: Arc<dyn PostStore>,

    /// User persistence
    pub users: Arc<dyn UserStore>,

    /// Generation client
    ///
    /// `None` when no usable API key is configured. Generation endpoints
    /// answer 503 in that case; everything else keeps working.
    pub generator: Option<GenerationClient>,

    /// JWT signing and verification keys
    pub sessions: Arc<SessionKeys>,

    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,

    /// Whether forgot-password returns the reset token in its body
    pub expose_reset_tokens: bool,
}

impl AppState {
    pub fn new(stores: Stores, generator: Option<GenerationClient>, sessions: SessionKeys) -> Self {
        Self {
            posts: stores.posts,
            users: stores.users,
            generator,
            sessions: Arc::new(sessions),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            expose_reset_tokens: false,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_reset_token_exposure(mut self, expose: bool) -> Self {
        self.expose_reset_tokens = expose;
        self
    }
}

impl FromRef<AppState> for Arc<dyn PostStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.posts.clone()
    }
}

impl FromRef<AppState> for Arc<dyn UserStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for Option<GenerationClient> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.generator.clone()
    }
}

impl FromRef<AppState> for Arc<SessionKeys> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}
