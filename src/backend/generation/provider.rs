/**
 * Text Generation Provider Seam
 *
 * The generation client talks to the remote model through `TextGenerator`
 * so the retry pipeline can be exercised without a network. `ProviderError`
 * carries whatever the provider reported; classifying it as transient or
 * fatal is the retry module's job.
 */

use async_trait::async_trait;
use std::fmt;

/// Error reported by a text-generation provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// HTTP status returned by the provider, if the request got that far
    pub status: Option<u16>,
    /// Provider or transport message
    pub message: String,
}

impl ProviderError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Error raised before any HTTP status was received
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ProviderError {}

/// A single text-completion call against a remote model
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Send `prompt` and return the generated text
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
