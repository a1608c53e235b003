//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer-token verification and the `AuthUser` / `FullUser`
//!   extractors

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser, FullUser};
