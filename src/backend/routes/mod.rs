//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Router assembly, health check, tracing and CORS
//! └── api_routes.rs   - /api/* routes and the auth middleware boundary
//! ```
//!
//! Unknown paths fall through to a JSON 404.

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
