/**
 * Generation Client
 *
 * Runs one logical "generate X" operation: render the prompt, call the
 * provider, classify the result, and retry transient failures according
 * to the `RetryPolicy`. Callers only ever see the final text or a single
 * `GenerationError`; intermediate attempts are logged, never surfaced.
 *
 * Every provider call is spawned as its own Tokio task and awaited, so a
 * slow provider never holds up the task serving other requests. Retries
 * within one operation are strictly sequential.
 */

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::backend::generation::gemini::{GeminiGenerator, GeminiSettings, InvalidApiKeyError};
use crate::backend::generation::prompt;
use crate::backend::generation::provider::{ProviderError, TextGenerator};
use crate::backend::generation::retry::{classify, FailureKind, Outcome, RetryPolicy};
use crate::shared::{GeneratedContent, GenerationOperation, GenerationParameters, GenerationRequest};

/// Terminal failure of a generation operation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct GenerationError {
    operation: GenerationOperation,
    attempts: u32,
    message: String,
}

impl GenerationError {
    fn empty(operation: GenerationOperation, attempts: u32) -> Self {
        Self {
            operation,
            attempts,
            message: "Generated content is empty".to_string(),
        }
    }

    fn failed(operation: GenerationOperation, attempts: u32, cause: &str) -> Self {
        Self {
            operation,
            attempts,
            message: format!("Failed to generate {}: {}", operation, cause),
        }
    }

    fn exhausted(operation: GenerationOperation, attempts: u32, cause: &str) -> Self {
        Self {
            operation,
            attempts,
            message: format!(
                "Failed to generate {} after {} attempts: {}",
                operation, attempts, cause
            ),
        }
    }

    pub fn operation(&self) -> GenerationOperation {
        self.operation
    }

    /// Number of provider calls made before giving up
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Client for the AI-assisted generation pipeline
#[derive(Clone)]
pub struct GenerationClient {
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("provider", &self.generator.name())
            .field("policy", &self.policy)
            .finish()
    }
}

impl GenerationClient {
    /// Build a client for the Gemini API
    ///
    /// Fails immediately when the API key is empty or the placeholder value.
    pub fn gemini(settings: GeminiSettings, policy: RetryPolicy) -> Result<Self, InvalidApiKeyError> {
        let generator = GeminiGenerator::new(settings)?;
        tracing::info!("Generation client configured for model {}", generator.model());
        Ok(Self::with_generator(Arc::new(generator), policy))
    }

    /// Build a client around any provider
    pub fn with_generator(generator: Arc<dyn TextGenerator>, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate a full blog post body
    pub async fn generate_blog_post(
        &self,
        params: &GenerationParameters,
    ) -> Result<String, GenerationError> {
        let (text, _) = self
            .run(GenerationOperation::BlogPost, prompt::blog_post_prompt(params))
            .await?;
        Ok(text)
    }

    /// Generate a meta description (at most 160 characters) for `content`
    pub async fn generate_meta_description(&self, content: &str) -> Result<String, GenerationError> {
        let operation = GenerationOperation::MetaDescription;
        let (raw, attempts) = self
            .run(operation, prompt::meta_description_prompt(content))
            .await?;

        let description = prompt::clean_meta_description(&raw);
        if description.is_empty() {
            return Err(GenerationError::empty(operation, attempts));
        }
        Ok(description)
    }

    /// Generate a URL slug for `title`
    ///
    /// The model output is always normalized, so the result only contains
    /// lowercase ASCII alphanumerics and single hyphens.
    pub async fn generate_slug(&self, title: &str) -> Result<String, GenerationError> {
        let operation = GenerationOperation::Slug;
        let (raw, attempts) = self.run(operation, prompt::slug_prompt(title)).await?;
        prompt::normalize_slug(&raw, title)
            .ok_or_else(|| GenerationError::empty(operation, attempts))
    }

    /// Dispatch a validated `GenerationRequest` to the matching operation
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        let content = match request.operation {
            GenerationOperation::BlogPost => self.generate_blog_post(&request.parameters).await?,
            GenerationOperation::MetaDescription => {
                self.generate_meta_description(request.content.as_deref().unwrap_or_default())
                    .await?
            }
            GenerationOperation::Slug => self.generate_slug(request.slug_source()).await?,
        };

        Ok(GeneratedContent {
            operation: request.operation,
            content,
        })
    }

    /// Returns the text together with the number of provider calls made
    async fn run(
        &self,
        operation: GenerationOperation,
        prompt: String,
    ) -> Result<(String, u32), GenerationError> {
        let started = Instant::now();
        let prompt: Arc<str> = Arc::from(prompt);
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!(
                "Generating {} via {} (attempt {}/{})",
                operation,
                self.generator.name(),
                attempt,
                self.policy.max_attempts
            );

            match classify(self.call_provider(Arc::clone(&prompt)).await) {
                Outcome::Success(text) => {
                    tracing::debug!("Generated {} ({} bytes)", operation, text.len());
                    return Ok((text, attempt));
                }
                Outcome::Failure(FailureKind::Empty) => {
                    tracing::warn!("Provider returned empty {}", operation);
                    return Err(GenerationError::empty(operation, attempt));
                }
                Outcome::Failure(FailureKind::Fatal(cause)) => {
                    tracing::error!("Generating {} failed: {}", operation, cause);
                    return Err(GenerationError::failed(operation, attempt, &cause));
                }
                Outcome::Failure(FailureKind::Transient(cause)) => {
                    if !self.policy.allows_retry(attempt, started.elapsed()) {
                        tracing::error!(
                            "Giving up on {} after {} attempts: {}",
                            operation,
                            attempt,
                            cause
                        );
                        return Err(GenerationError::exhausted(operation, attempt, &cause));
                    }

                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        "Transient provider error generating {}, retrying in {:?}: {}",
                        operation,
                        delay,
                        cause
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn call_provider(&self, prompt: Arc<str>) -> Result<String, ProviderError> {
        let generator = Arc::clone(&self.generator);
        tokio::spawn(async move { generator.complete(&prompt).await })
            .await
            .unwrap_or_else(|e| Err(ProviderError::transport(format!("Generation task failed: {}", e))))
    }
}
