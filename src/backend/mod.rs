//! Backend Module
//!
//! All server-side code: the Axum HTTP server, the generation pipeline,
//! storage and authentication.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly
//! - **`generation`** - Prompt builder and generation client with retry
//! - **`storage`** - `PostStore` / `UserStore` and their adapters
//! - **`auth`** - Registration, login, sessions, password reset
//! - **`posts`** - Post CRUD and generation handlers
//! - **`middleware`** - Bearer-token authentication
//! - **`error`** - Backend error type and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - blogsmith-server entry point
//! ├── server/         - Config, state, initialization
//! ├── routes/         - Route configuration
//! ├── generation/     - AI generation pipeline
//! ├── storage/        - Persistence adapters
//! ├── auth/           - Authentication
//! ├── posts/          - Post handlers
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the stores as trait objects, the optional generation
//! client and the session keys. It is cloned into every handler; handlers
//! extract just the part they need through `FromRef`.

/// Server initialization and state
pub mod server;

/// Route configuration
pub mod routes;

/// AI generation pipeline
pub mod generation;

/// Post and user persistence
pub mod storage;

/// Authentication and user management
pub mod auth;

/// Blog post handlers
pub mod posts;

/// Request middleware
pub mod middleware;

/// Backend error types
pub mod error;
