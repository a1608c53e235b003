/**
 * Post Handlers
 *
 * CRUD over `PostStore` plus the two generation endpoints. Reads are
 * public; every mutation needs a full session, and editing or deleting a
 * post is limited to its author.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::generation::prompt::slugify;
use crate::backend::generation::GenerationClient;
use crate::backend::middleware::{AuthUser, FullUser};
use crate::backend::posts::types::{GeneratePostRequest, ListPostsParams, MAX_LIST_LIMIT};
use crate::backend::storage::PostStore;
use crate::shared::{
    BlogPost, CreatePostRequest, GeneratedContent, GenerationRequest, NewPost, PostQuery,
    PostStatus, PostUpdate, SharedError,
};

/// Resolve the generation client or answer 503
fn require_generator(generator: Option<GenerationClient>) -> Result<GenerationClient, BackendError> {
    generator.ok_or_else(|| {
        tracing::warn!("Generation requested but no generation client is configured");
        BackendError::state("Generation service is not configured")
    })
}

/// Load a post and check the caller wrote it
async fn owned_post(
    posts: &dyn PostStore,
    id: &str,
    user_id: &str,
) -> Result<BlogPost, BackendError> {
    let post = posts
        .get(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;

    if post.author_id != user_id {
        tracing::warn!("User {} tried to modify post {} of {}", user_id, id, post.author_id);
        return Err(BackendError::handler(
            StatusCode::FORBIDDEN,
            "Not authorized to modify this post",
        ));
    }
    Ok(post)
}

/// GET /api/posts
pub async fn list_posts(
    State(posts): State<Arc<dyn PostStore>>,
    Query(params): Query<ListPostsParams>,
) -> Result<Json<Vec<BlogPost>>, BackendError> {
    let query = params.into_query()?;
    Ok(Json(posts.list(&query).await?))
}

/// GET /api/posts/mine
pub async fn my_posts(
    State(posts): State<Arc<dyn PostStore>>,
    FullUser(caller): FullUser,
) -> Result<Json<Vec<BlogPost>>, BackendError> {
    let query = PostQuery {
        limit: MAX_LIST_LIMIT,
        status: None,
        author_id: Some(caller.user_id),
    };
    Ok(Json(posts.list(&query).await?))
}

/// GET /api/posts/{id}
///
/// Every successful read counts as a view.
pub async fn get_post(
    State(posts): State<Arc<dyn PostStore>>,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>, BackendError> {
    let post = posts
        .increment_views(&id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;
    Ok(Json(post))
}

/// POST /api/posts
pub async fn create_post(
    State(posts): State<Arc<dyn PostStore>>,
    FullUser(caller): FullUser,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<BlogPost>), BackendError> {
    request.validate()?;

    let slug = match request.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => slugify(&request.title),
    };
    if slug.is_empty() {
        return Err(SharedError::validation("slug", "Could not derive a slug from the title").into());
    }

    let post = posts
        .create(NewPost {
            title: request.title.trim().to_string(),
            content: request.content,
            slug,
            author_id: caller.user_id,
            status: request.status.unwrap_or_default(),
            tags: request.tags,
            category: request.category,
            featured_image: request.featured_image,
            meta_description: request.meta_description,
        })
        .await?;

    tracing::info!("Post {} created by {}", post.id, post.author_id);
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    State(posts): State<Arc<dyn PostStore>>,
    FullUser(caller): FullUser,
    Path(id): Path<String>,
    Json(update): Json<PostUpdate>,
) -> Result<Json<BlogPost>, BackendError> {
    update.validate()?;
    owned_post(posts.as_ref(), &id, &caller.user_id).await?;

    let post = posts
        .update(&id, update)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;

    tracing::info!("Post {} updated", post.id);
    Ok(Json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(posts): State<Arc<dyn PostStore>>,
    FullUser(caller): FullUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, BackendError> {
    owned_post(posts.as_ref(), &id, &caller.user_id).await?;

    if !posts.delete(&id).await? {
        return Err(BackendError::not_found("Post not found"));
    }

    tracing::info!("Post {} deleted", id);
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

/// POST /api/generate
///
/// Runs one pipeline operation and returns the text without storing it.
pub async fn generate_preview(
    State(generator): State<Option<GenerationClient>>,
    AuthUser(caller): AuthUser,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GeneratedContent>, BackendError> {
    let generator = require_generator(generator)?;
    request.validate()?;

    tracing::info!("Generating {} preview for {}", request.operation, caller.user_id);
    let generated = generator.generate(&request).await?;
    Ok(Json(generated))
}

/// POST /api/posts/generate
///
/// Generates body, meta description and slug, then stores a draft.
pub async fn generate_post(
    State(posts): State<Arc<dyn PostStore>>,
    State(generator): State<Option<GenerationClient>>,
    FullUser(caller): FullUser,
    Json(request): Json<GeneratePostRequest>,
) -> Result<(StatusCode, Json<BlogPost>), BackendError> {
    let generator = require_generator(generator)?;
    request.parameters.validate()?;

    let title = request.title().to_string();
    tracing::info!("Generating post '{}' for {}", title, caller.user_id);

    let content = generator.generate_blog_post(&request.parameters).await?;
    let meta_description = generator.generate_meta_description(&content).await?;
    let slug = generator.generate_slug(&title).await?;

    let post = posts
        .create(NewPost {
            title,
            content,
            slug,
            author_id: caller.user_id,
            status: PostStatus::Draft,
            tags: request.parameters.keywords.clone(),
            category: None,
            featured_image: None,
            meta_description: Some(meta_description),
        })
        .await?;

    tracing::info!("Generated draft {} stored", post.id);
    Ok((StatusCode::CREATED, Json(post)))
}
