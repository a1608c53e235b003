/**
 * PostgreSQL Storage
 *
 * `PostStore` and `UserStore` over a sqlx `PgPool`. Migrations in
 * `migrations/` are applied at connect time; a migration failure is logged
 * and startup continues, since the schema may already be current.
 *
 * Ids are UUID columns. A lookup by an id that is not a UUID simply finds
 * nothing.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::backend::storage::{PostStore, StorageError, UserStore};
use crate::shared::{BlogPost, NewPost, PostQuery, PostStatus, PostUpdate};

const POST_COLUMNS: &str = "id, title, content, slug, author_id, status, tags, category, \
     featured_image, meta_description, published_at, views, created_at, updated_at";

const USER_COLUMNS: &str =
    "id, email, display_name, password_hash, role, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    slug: String,
    author_id: String,
    status: String,
    tags: Vec<String>,
    category: Option<String>,
    featured_image: Option<String>,
    meta_description: Option<String>,
    published_at: Option<DateTime<Utc>>,
    views: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for BlogPost {
    type Error = StorageError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let status: PostStatus = row
            .status
            .parse()
            .map_err(|_| StorageError::Corrupt(format!("post {} has status {:?}", row.id, row.status)))?;

        Ok(BlogPost {
            id: row.id.to_string(),
            title: row.title,
            content: row.content,
            slug: row.slug,
            author_id: row.author_id,
            status,
            tags: row.tags,
            category: row.category,
            featured_image: row.featured_image,
            meta_description: row.meta_description,
            published_at: row.published_at,
            views: row.views,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    display_name: Option<String>,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id.to_string(),
            email: row.email,
            display_name: row.display_name,
            password_hash: row.password_hash,
            role: row.role,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Map unique violations to `StorageError::Conflict`
fn conflict_or(err: sqlx::Error, what: impl FnOnce() -> String) -> StorageError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict(what()),
        _ => StorageError::Database(err),
    }
}

/// PostgreSQL-backed `PostStore` and `UserStore`
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and run migrations
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        tracing::info!("Connecting to database...");
        let pool = PgPool::connect(database_url).await?;
        tracing::info!("Database connection pool created successfully");

        tracing::info!("Running database migrations...");
        sqlx::migrate!().run(&pool).await.map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            StorageError::from(e)
        })?;
        tracing::info!("Database migrations completed successfully");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StorageError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {} FROM blog_posts WHERE id = $1",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BlogPost::try_from).transpose()
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<BlogPost>, StorageError> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {}
            FROM blog_posts
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR author_id = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
            POST_COLUMNS
        ))
        .bind(query.status.map(PostStatus::as_str))
        .bind(query.author_id.as_deref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BlogPost::try_from).collect()
    }

    async fn create(&self, post: NewPost) -> Result<BlogPost, StorageError> {
        let post = BlogPost::from_new(Uuid::new_v4().to_string(), post, Utc::now());
        let id = Uuid::parse_str(&post.id)
            .map_err(|e| StorageError::Corrupt(format!("generated id: {}", e)))?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO blog_posts ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            POST_COLUMNS, POST_COLUMNS
        ))
        .bind(id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.slug)
        .bind(&post.author_id)
        .bind(post.status.as_str())
        .bind(&post.tags)
        .bind(&post.category)
        .bind(&post.featured_image)
        .bind(&post.meta_description)
        .bind(post.published_at)
        .bind(post.views)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await?;

        BlogPost::try_from(row)
    }

    async fn update(&self, id: &str, update: PostUpdate) -> Result<Option<BlogPost>, StorageError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {} FROM blog_posts WHERE id = $1 FOR UPDATE",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut post = BlogPost::try_from(row)?;
        post.apply(update, Utc::now());

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE blog_posts SET
                title = $2,
                content = $3,
                slug = $4,
                status = $5,
                tags = $6,
                category = $7,
                featured_image = $8,
                meta_description = $9,
                published_at = $10,
                updated_at = $11
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.slug)
        .bind(post.status.as_str())
        .bind(&post.tags)
        .bind(&post.category)
        .bind(&post.featured_image)
        .bind(&post.meta_description)
        .bind(post.published_at)
        .bind(post.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        BlogPost::try_from(row).map(Some)
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_views(&self, id: &str) -> Result<Option<BlogPost>, StorageError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE blog_posts SET views = views + 1 WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BlogPost::try_from).transpose()
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        let email = user.email.clone();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'user', TRUE, NOW(), NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, || format!("Email {} is already registered", email)))?;

        Ok(row.into())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, StorageError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update_password(
        &self,
        id: &str,
        password_hash: String,
    ) -> Result<Option<User>, StorageError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }
}
