//! Authentication Handlers Module
//!
//! HTTP handlers for the authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - User registration handler
//! ├── login.rs     - User authentication handler
//! ├── me.rs        - Current user and anonymous sign-in
//! └── password.rs  - Forgot/reset password
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`anonymous`** - POST /api/auth/anonymous
//! - **`get_me`** - GET /api/auth/me (requires a session)
//! - **`forgot_password`** - POST /api/auth/forgot-password
//! - **`reset_password`** - POST /api/auth/reset-password

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Current user handlers
pub mod me;

/// Password reset handlers
pub mod password;

pub use types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

pub use login::login;
pub use me::{anonymous, get_me};
pub use password::{forgot_password, reset_password};
pub use register::register;
