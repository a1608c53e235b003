//! Authentication Module
//!
//! User registration, login, anonymous sessions and password resets.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model, validation, password hashing
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email + password → user created → session token returned
//! 2. **Login**: email + password → credentials verified → session token returned
//! 3. **Anonymous**: no input → anonymous session token returned
//! 4. **Me**: session token → caller info returned
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Session tokens expire after 30 days, reset tokens after 30 minutes
//! - Invalid credentials return 401 without saying which part was wrong
//! - Anonymous sessions cannot create, edit or delete posts

/// User model and validation
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{anonymous, forgot_password, get_me, login, register, reset_password};
pub use handlers::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
pub use sessions::{Claims, SessionError, SessionKeys};
