//! Generation request types
//!
//! Parameters accepted by the AI-assisted content generation endpoints. These
//! are plain data: rendering them into prompts lives in
//! `backend::generation::prompt`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::error::SharedError;

/// Target length of a generated blog post
///
/// Unrecognized values deserialize to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum BlogLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl BlogLength {
    /// Word-count guide included in the prompt
    pub fn word_guide(self) -> &'static str {
        match self {
            BlogLength::Short => "500-800 words",
            BlogLength::Medium => "1000-1500 words",
            BlogLength::Long => "2000-2500 words",
        }
    }
}

impl From<String> for BlogLength {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for BlogLength {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "short" => BlogLength::Short,
            "long" => BlogLength::Long,
            _ => BlogLength::Medium,
        }
    }
}

fn default_tone() -> String {
    "professional".to_string()
}

fn default_audience() -> String {
    "general".to_string()
}

/// Parameters for generating a blog post body
///
/// `topic` is required and must be non-empty; call [`validate`](Self::validate)
/// before rendering a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParameters {
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default)]
    pub length: BlogLength,
    #[serde(default = "default_audience")]
    pub target_audience: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl GenerationParameters {
    /// Parameters for `topic` with every other field at its default
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            tone: default_tone(),
            length: BlogLength::default(),
            target_audience: default_audience(),
            keywords: Vec::new(),
        }
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    pub fn with_length(mut self, length: BlogLength) -> Self {
        self.length = length;
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = audience.into();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Reject parameters that cannot produce a meaningful prompt
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.topic.trim().is_empty() {
            return Err(SharedError::validation("topic", "Topic must not be empty"));
        }
        Ok(())
    }
}

/// One of the three generation pipeline operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationOperation {
    BlogPost,
    MetaDescription,
    Slug,
}

impl fmt::Display for GenerationOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GenerationOperation::BlogPost => "blog post",
            GenerationOperation::MetaDescription => "meta description",
            GenerationOperation::Slug => "slug",
        };
        f.write_str(label)
    }
}

/// Body of `POST /api/generate`
///
/// `content` feeds meta-description generation; `title` (falling back to the
/// topic) feeds slug generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub operation: GenerationOperation,
    #[serde(flatten)]
    pub parameters: GenerationParameters,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl GenerationRequest {
    /// Validate the fields the selected operation reads
    pub fn validate(&self) -> Result<(), SharedError> {
        match self.operation {
            GenerationOperation::BlogPost => self.parameters.validate(),
            GenerationOperation::MetaDescription => match self.content.as_deref() {
                Some(content) if !content.trim().is_empty() => Ok(()),
                _ => Err(SharedError::validation("content", "Content must not be empty")),
            },
            GenerationOperation::Slug => {
                if self.slug_source().trim().is_empty() {
                    Err(SharedError::validation("title", "Title or topic must not be empty"))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Text a slug is generated from
    pub fn slug_source(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.parameters.topic,
        }
    }
}

/// Result of a generation operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub operation: GenerationOperation,
    pub content: String,
}
