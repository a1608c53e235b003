//! Posts Module
//!
//! HTTP handlers for blog posts and AI-assisted generation.
//!
//! # Routes
//!
//! - `GET /api/posts` - List posts (`limit`, `status`, `author`)
//! - `GET /api/posts/mine` - The caller's posts
//! - `GET /api/posts/{id}` - One post; counts a view
//! - `POST /api/posts` - Create a post
//! - `PUT /api/posts/{id}` - Update a post (author only)
//! - `DELETE /api/posts/{id}` - Delete a post (author only)
//! - `POST /api/generate` - Preview one generation operation
//! - `POST /api/posts/generate` - Generate and store a draft

/// Request types
pub mod types;

/// Route handlers
pub mod handlers;

pub use handlers::{
    create_post, delete_post, generate_post, generate_preview, get_post, list_posts, my_posts,
    update_post,
};
