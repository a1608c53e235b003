/**
 * JSON File Storage
 *
 * Keeps posts and users in one JSON document:
 *
 * ```json
 * { "posts": { "<id>": { ... } }, "users": { "<id>": { ... } } }
 * ```
 *
 * The whole document is held in memory behind an `RwLock` and rewritten on
 * every mutation (temp file, then rename). A mutation is applied to a copy
 * first, so a failed write leaves the in-memory view unchanged.
 */

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::backend::storage::{PostStore, StorageError, UserStore};
use crate::shared::{BlogPost, NewPost, PostQuery, PostUpdate};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    posts: BTreeMap<String, BlogPost>,
    #[serde(default)]
    users: BTreeMap<String, User>,
}

/// File-backed `PostStore` and `UserStore`
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    document: RwLock<Document>,
}

impl FileStore {
    /// Load the document at `path`, starting empty if the file is missing
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Document::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No data file at {}, starting empty", path.display());
                Document::default()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "Loaded {} posts and {} users from {}",
            document.posts.len(),
            document.users.len(),
            path.display()
        );

        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, document: &Document) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Run `f` against a copy of the document, persist, then commit
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut guard = self.document.write().await;
        let mut next = guard.clone();
        let result = f(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(result)
    }
}

#[async_trait]
impl PostStore for FileStore {
    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StorageError> {
        Ok(self.document.read().await.posts.get(id).cloned())
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<BlogPost>, StorageError> {
        let document = self.document.read().await;
        let mut posts: Vec<BlogPost> = document
            .posts
            .values()
            .filter(|post| query.matches(post))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(query.limit);
        Ok(posts)
    }

    async fn create(&self, post: NewPost) -> Result<BlogPost, StorageError> {
        let post = BlogPost::from_new(Uuid::new_v4().to_string(), post, Utc::now());
        let created = post.clone();
        self.mutate(move |doc| {
            doc.posts.insert(post.id.clone(), post);
            Ok(())
        })
        .await?;
        tracing::debug!("Created post {}", created.id);
        Ok(created)
    }

    async fn update(&self, id: &str, update: PostUpdate) -> Result<Option<BlogPost>, StorageError> {
        if !self.document.read().await.posts.contains_key(id) {
            return Ok(None);
        }
        self.mutate(|doc| {
            Ok(doc.posts.get_mut(id).map(|post| {
                post.apply(update, Utc::now());
                post.clone()
            }))
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        if !self.document.read().await.posts.contains_key(id) {
            return Ok(false);
        }
        self.mutate(|doc| Ok(doc.posts.remove(id).is_some())).await
    }

    async fn increment_views(&self, id: &str) -> Result<Option<BlogPost>, StorageError> {
        if !self.document.read().await.posts.contains_key(id) {
            return Ok(None);
        }
        self.mutate(|doc| {
            Ok(doc.posts.get_mut(id).map(|post| {
                post.views += 1;
                post.clone()
            }))
        })
        .await
    }
}

#[async_trait]
impl UserStore for FileStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        let user = User::from_new(Uuid::new_v4().to_string(), user, Utc::now());
        let created = user.clone();
        self.mutate(move |doc| {
            if doc.users.values().any(|u| u.email == user.email) {
                return Err(StorageError::Conflict(format!(
                    "Email {} is already registered",
                    user.email
                )));
            }
            doc.users.insert(user.id.clone(), user);
            Ok(())
        })
        .await?;
        Ok(created)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let document = self.document.read().await;
        Ok(document.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, StorageError> {
        Ok(self.document.read().await.users.get(id).cloned())
    }

    async fn update_password(
        &self,
        id: &str,
        password_hash: String,
    ) -> Result<Option<User>, StorageError> {
        if !self.document.read().await.users.contains_key(id) {
            return Ok(None);
        }
        self.mutate(|doc| {
            Ok(doc.users.get_mut(id).map(|user| {
                user.password_hash = password_hash;
                user.updated_at = Utc::now();
                user.clone()
            }))
        })
        .await
    }
}
