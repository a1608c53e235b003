//! Shared Module
//!
//! Domain types used by both the HTTP handlers and the storage adapters.
//! Nothing in here performs I/O; every type is designed for serialization
//! over the JSON API and into the file-backed store.

/// Blog post data structures
pub mod post;

/// Generation request parameters
pub mod generation;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use generation::{
    BlogLength, GeneratedContent, GenerationOperation, GenerationParameters, GenerationRequest,
};
pub use post::{BlogPost, CreatePostRequest, NewPost, PostQuery, PostStatus, PostUpdate};
