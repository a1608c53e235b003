//! Blog post data structures
//!
//! `BlogPost` is the stored document; `NewPost` and `PostUpdate` are the
//! inputs storage adapters accept. Timestamps serialize as RFC 3339.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;

/// Publication state of a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(SharedError::validation(
                "status",
                format!("Unknown post status '{}'", other),
            )),
        }
    }
}

/// A stored blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author_id: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Materialize a new post with a server-assigned id
    pub fn from_new(id: String, new: NewPost, now: DateTime<Utc>) -> Self {
        let published_at = (new.status == PostStatus::Published).then_some(now);
        Self {
            id,
            title: new.title,
            content: new.content,
            slug: new.slug,
            author_id: new.author_id,
            status: new.status,
            tags: new.tags,
            category: new.category,
            featured_image: new.featured_image,
            meta_description: new.meta_description,
            published_at,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update and bump `updated_at`
    ///
    /// Publishing stamps `published_at` the first time only.
    pub fn apply(&mut self, update: PostUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(slug) = update.slug {
            self.slug = slug;
        }
        if let Some(status) = update.status {
            if status == PostStatus::Published && self.published_at.is_none() {
                self.published_at = Some(now);
            }
            self.status = status;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(featured_image) = update.featured_image {
            self.featured_image = Some(featured_image);
        }
        if let Some(meta_description) = update.meta_description {
            self.meta_description = Some(meta_description);
        }
        self.updated_at = now;
    }
}

/// Input for creating a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author_id: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

/// Partial update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

impl PostUpdate {
    pub fn validate(&self) -> Result<(), SharedError> {
        if matches!(self.title.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(SharedError::validation("title", "Title must not be empty"));
        }
        if matches!(self.slug.as_deref(), Some(s) if s.trim().is_empty()) {
            return Err(SharedError::validation("slug", "Slug must not be empty"));
        }
        Ok(())
    }
}

/// Body of `POST /api/posts`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.title.trim().is_empty() {
            return Err(SharedError::validation("title", "Title must not be empty"));
        }
        Ok(())
    }
}

/// Filters for listing posts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub limit: usize,
    pub status: Option<PostStatus>,
    pub author_id: Option<String>,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            status: None,
            author_id: None,
        }
    }
}

impl PostQuery {
    /// Whether `post` passes the status and author filters
    pub fn matches(&self, post: &BlogPost) -> bool {
        self.status.map_or(true, |status| post.status == status)
            && self
                .author_id
                .as_deref()
                .map_or(true, |author| post.author_id == author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_post(status: PostStatus) -> NewPost {
        NewPost {
            title: "Hello".to_string(),
            content: "Body".to_string(),
            slug: "hello".to_string(),
            author_id: "author-1".to_string(),
            status,
            tags: vec!["rust".to_string()],
            category: None,
            featured_image: None,
            meta_description: None,
        }
    }

    #[test]
    fn test_from_new_sets_defaults() {
        let now = Utc::now();
        let post = BlogPost::from_new("id-1".to_string(), new_post(PostStatus::Draft), now);
        assert_eq!(post.views, 0);
        assert_eq!(post.created_at, now);
        assert_eq!(post.updated_at, now);
        assert_eq!(post.published_at, None);
    }

    #[test]
    fn test_publish_stamps_once() {
        let created = Utc::now();
        let mut post = BlogPost::from_new("id-1".to_string(), new_post(PostStatus::Draft), created);

        let first = created + chrono::Duration::seconds(5);
        post.apply(
            PostUpdate {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
            first,
        );
        assert_eq!(post.published_at, Some(first));

        let second = first + chrono::Duration::seconds(5);
        post.apply(
            PostUpdate {
                status: Some(PostStatus::Published),
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
            second,
        );
        assert_eq!(post.published_at, Some(first));
        assert_eq!(post.updated_at, second);
        assert_eq!(post.title, "Renamed");
        assert_eq!(post.content, "Body");
    }

    #[test]
    fn test_status_round_trips_as_lowercase() {
        let json = serde_json::to_value(PostStatus::Archived).unwrap();
        assert_eq!(json, serde_json::json!("archived"));
        assert_eq!("published".parse::<PostStatus>().unwrap(), PostStatus::Published);
        assert!("deleted".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_timestamps_serialize_iso8601() {
        let post = BlogPost::from_new("id-1".to_string(), new_post(PostStatus::Draft), Utc::now());
        let json = serde_json::to_value(&post).unwrap();
        let created = json["created_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    }

    #[test]
    fn test_query_matches() {
        let post = BlogPost::from_new("id-1".to_string(), new_post(PostStatus::Draft), Utc::now());
        assert!(PostQuery::default().matches(&post));
        let by_status = PostQuery {
            status: Some(PostStatus::Published),
            ..Default::default()
        };
        assert!(!by_status.matches(&post));
        let by_author = PostQuery {
            author_id: Some("author-1".to_string()),
            ..Default::default()
        };
        assert!(by_author.matches(&post));
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let update = PostUpdate {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(PostUpdate::default().validate().is_ok());
    }
}
