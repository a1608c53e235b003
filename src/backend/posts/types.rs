/**
 * Post Handler Types
 */

use serde::{Deserialize, Serialize};

use crate::shared::{GenerationParameters, PostQuery, PostStatus, SharedError};

/// Upper bound for `?limit=`
pub const MAX_LIST_LIMIT: usize = 100;

/// Query string of `GET /api/posts`
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsParams {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl ListPostsParams {
    pub fn into_query(self) -> Result<PostQuery, SharedError> {
        let status = self
            .status
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<PostStatus>())
            .transpose()?;

        Ok(PostQuery {
            limit: self
                .limit
                .unwrap_or(PostQuery::default().limit)
                .min(MAX_LIST_LIMIT),
            status,
            author_id: self.author.filter(|a| !a.trim().is_empty()),
        })
    }
}

/// Body of `POST /api/posts/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePostRequest {
    #[serde(flatten)]
    pub parameters: GenerationParameters,
    /// Post title; the topic is used when absent
    #[serde(default)]
    pub title: Option<String>,
}

impl GeneratePostRequest {
    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.parameters.topic.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_list_params_defaults_and_cap() {
        let query = ListPostsParams::default().into_query().unwrap();
        assert_eq!(query.limit, 10);

        let query = ListPostsParams {
            limit: Some(500),
            ..ListPostsParams::default()
        }
        .into_query()
        .unwrap();
        assert_eq!(query.limit, MAX_LIST_LIMIT);
    }

    #[test]
    fn test_list_params_status() {
        let query = ListPostsParams {
            status: Some("published".to_string()),
            ..ListPostsParams::default()
        }
        .into_query()
        .unwrap();
        assert_eq!(query.status, Some(PostStatus::Published));

        assert_matches!(
            ListPostsParams {
                status: Some("bogus".to_string()),
                ..ListPostsParams::default()
            }
            .into_query(),
            Err(SharedError::ValidationError { .. })
        );
    }

    #[test]
    fn test_generate_request_title_falls_back_to_topic() {
        let request: GeneratePostRequest =
            serde_json::from_value(serde_json::json!({"topic": "Rust async"})).unwrap();
        assert_eq!(request.title(), "Rust async");

        let request: GeneratePostRequest = serde_json::from_value(
            serde_json::json!({"topic": "Rust async", "title": "Async in Practice"}),
        )
        .unwrap();
        assert_eq!(request.title(), "Async in Practice");
    }
}
