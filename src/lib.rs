//! Blogsmith - Main Library
//!
//! Blogsmith is a blog-authoring backend built around an AI generation
//! pipeline: parameters are turned into a prompt, sent to a remote text
//! model, retried on quota errors, and post-processed into blog bodies,
//! meta descriptions and URL slugs.
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic domain types
//!   - Generation parameters and requests
//!   - Blog posts, statuses, request payloads
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Generation pipeline (prompt builder, retry, Gemini transport)
//!   - Storage (JSON file or PostgreSQL)
//!   - Authentication (bcrypt, JWT sessions, anonymous sessions)
//!   - Axum routes and handlers
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the
//!   `blogsmith-server` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use blogsmith::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation and serialization
//! - `backend::generation::GenerationError` for generation failures
//! - `backend::error::BackendError` for everything returned over HTTP

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
