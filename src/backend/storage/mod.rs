//! Storage Module
//!
//! Persistence for blog posts and users behind two capability traits,
//! `PostStore` and `UserStore`. Handlers only see the traits; the concrete
//! adapter is chosen once at process start and injected into `AppState`.
//!
//! # Adapters
//!
//! - **`file`** - `FileStore`, a JSON document rewritten on every mutation
//! - **`postgres`** - `PgStore`, PostgreSQL through sqlx with migrations
//!
//! Both adapters assign opaque string ids (UUID v4) and RFC 3339 timestamps.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::backend::auth::users::{NewUser, User};
use crate::shared::{BlogPost, NewPost, PostQuery, PostUpdate};

/// JSON file adapter
pub mod file;

/// PostgreSQL adapter
pub mod postgres;

pub use file::FileStore;
pub use postgres::PgStore;

/// Storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migrations could not be applied
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored record holds a value the domain types reject
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Blog post persistence
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StorageError>;

    /// Posts matching `query`, newest first, at most `query.limit`
    async fn list(&self, query: &PostQuery) -> Result<Vec<BlogPost>, StorageError>;

    async fn create(&self, post: NewPost) -> Result<BlogPost, StorageError>;

    /// Apply a partial update; `None` when the post does not exist
    async fn update(&self, id: &str, update: PostUpdate) -> Result<Option<BlogPost>, StorageError>;

    /// `true` when a post was removed
    async fn delete(&self, id: &str) -> Result<bool, StorageError>;

    async fn increment_views(&self, id: &str) -> Result<Option<BlogPost>, StorageError>;
}

/// User persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `StorageError::Conflict` when the email is taken
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, StorageError>;

    async fn update_password(
        &self,
        id: &str,
        password_hash: String,
    ) -> Result<Option<User>, StorageError>;
}

/// Which adapter to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    File { path: PathBuf },
    Postgres { url: String },
}

/// The chosen adapter, as both capability sets
#[derive(Clone)]
pub struct Stores {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// Use one adapter for both posts and users
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: PostStore + UserStore + 'static,
    {
        Self {
            posts: store.clone(),
            users: store,
        }
    }
}

/// Open the configured storage backend
pub async fn open(backend: &StorageBackend) -> Result<Stores, StorageError> {
    match backend {
        StorageBackend::File { path } => {
            tracing::info!("Using file storage at {}", path.display());
            let store = FileStore::open(path.clone()).await?;
            Ok(Stores::from_shared(Arc::new(store)))
        }
        StorageBackend::Postgres { url } => {
            tracing::info!("Using PostgreSQL storage");
            let store = PgStore::connect(url).await?;
            Ok(Stores::from_shared(Arc::new(store)))
        }
    }
}
