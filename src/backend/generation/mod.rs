//! AI Generation Module
//!
//! The AI-assisted content pipeline: parameters are rendered into a prompt,
//! sent to a remote text-generation model, and the result is classified,
//! retried on quota/rate-limit errors, and post-processed.
//!
//! # Module Structure
//!
//! ```text
//! generation/
//! ├── mod.rs       - Module exports and documentation
//! ├── prompt.rs    - Prompt templates, slug and meta-description cleanup
//! ├── retry.rs     - RetryPolicy, outcome classification
//! ├── provider.rs  - TextGenerator trait and ProviderError
//! ├── gemini.rs    - Gemini REST transport, API key validation
//! └── client.rs    - GenerationClient (call, classify, retry)
//! ```
//!
//! # Error Handling
//!
//! - `InvalidApiKeyError` is raised when building a Gemini client with an
//!   empty or placeholder key. It is never retried.
//! - `GenerationError` is the single terminal error of an operation: empty
//!   output, a non-transient provider error, or retry exhaustion.

/// Prompt templates and output cleanup
pub mod prompt;

/// Retry policy and outcome classification
pub mod retry;

/// Provider seam
pub mod provider;

/// Gemini transport
pub mod gemini;

/// Generation client
pub mod client;

pub use client::{GenerationClient, GenerationError};
pub use gemini::{GeminiGenerator, GeminiSettings, InvalidApiKeyError};
pub use provider::{ProviderError, TextGenerator};
pub use retry::RetryPolicy;
