//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and can be converted to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Error Types
//!
//! - `HandlerError` - Request-level failures with an explicit status
//! - `StateError` - A required service is not available
//! - `SharedError` - Validation and serialization errors
//! - `StorageError` - Persistence failures
//! - `SessionError` - Token verification failures
//! - `GenerationError` - Generation pipeline failures

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
