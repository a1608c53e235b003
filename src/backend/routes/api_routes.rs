/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/auth/register`, `/login`, `/anonymous`
 * - `POST /api/auth/forgot-password`, `/reset-password`
 * - `GET /api/posts`, `GET /api/posts/{id}`
 *
 * ## Session required (`auth_middleware`)
 * - `GET /api/auth/me`
 * - `GET /api/posts/mine`
 * - `POST /api/posts`, `PUT|DELETE /api/posts/{id}`
 * - `POST /api/generate`, `POST /api/posts/generate`
 *
 * Whether an anonymous session is enough is decided per handler by the
 * `AuthUser` / `FullUser` extractors.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{anonymous, forgot_password, get_me, login, register, reset_password};
use crate::backend::middleware::auth_middleware;
use crate::backend::posts::{
    create_post, delete_post, generate_post, generate_preview, get_post, list_posts, my_posts,
    update_post,
};
use crate::backend::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/anonymous", post(anonymous))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/{id}", get(get_post));

    let protected = Router::new()
        .route("/api/auth/me", get(get_me))
        .route("/api/posts/mine", get(my_posts))
        .route("/api/posts", post(create_post))
        .route(
            "/api/posts/{id}",
            axum::routing::put(update_post).delete(delete_post),
        )
        .route("/api/generate", post(generate_preview))
        .route("/api/posts/generate", post(generate_post))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    router.merge(public).merge(protected)
}
