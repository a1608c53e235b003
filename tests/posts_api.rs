//! Post API integration tests
//!
//! CRUD, ownership checks, view counting and listing filters.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{anonymous, create_post, register, spawn_app_without_generator};

#[tokio::test]
async fn test_health() {
    let app = spawn_app_without_generator().await;
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = spawn_app_without_generator().await;
    let response = app.server.get("/api/nope").await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_post_derives_slug_and_author() {
    let app = spawn_app_without_generator().await;
    let (token, user_id) = register(&app.server, "author@example.com").await;

    let post = create_post(
        &app.server,
        &token,
        json!({ "title": "Hello, World! Part 2", "content": "Body", "tags": ["intro"] }),
    )
    .await;

    assert_eq!(post["slug"], "hello-world-part-2");
    assert_eq!(post["author_id"], user_id.as_str());
    assert_eq!(post["status"], "draft");
    assert_eq!(post["views"], 0);
    assert_eq!(post["tags"], json!(["intro"]));
    assert!(post["published_at"].is_null());
}

#[tokio::test]
async fn test_create_post_requires_full_session() {
    let app = spawn_app_without_generator().await;
    let body = json!({ "title": "Title", "content": "Body" });

    let response = app.server.post("/api/posts").json(&body).await;
    assert_error_body!(response, StatusCode::UNAUTHORIZED);

    let anon = anonymous(&app.server).await;
    let response = app
        .server
        .post("/api/posts")
        .authorization_bearer(&anon)
        .json(&body)
        .await;
    let message = assert_error_body!(response, StatusCode::UNAUTHORIZED);
    assert_eq!(
        message,
        "Full authentication required, anonymous access not allowed."
    );
}

#[tokio::test]
async fn test_create_post_rejects_blank_title() {
    let app = spawn_app_without_generator().await;
    let (token, _) = register(&app.server, "blank@example.com").await;

    let response = app
        .server
        .post("/api/posts")
        .authorization_bearer(&token)
        .json(&json!({ "title": "   ", "content": "Body" }))
        .await;
    assert_error_body!(response, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_post_counts_views() {
    let app = spawn_app_without_generator().await;
    let (token, _) = register(&app.server, "views@example.com").await;
    let post = create_post(&app.server, &token, json!({ "title": "Seen", "content": "Body" })).await;
    let path = format!("/api/posts/{}", post["id"].as_str().unwrap());

    app.server.get(&path).await.assert_status_ok();
    let response = app.server.get(&path).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["views"], 2);

    let missing = app.server.get("/api/posts/does-not-exist").await;
    assert_error_body!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_posts_filters() {
    let app = spawn_app_without_generator().await;
    let (alice, alice_id) = register(&app.server, "alice@example.com").await;
    let (bob, _) = register(&app.server, "bob@example.com").await;

    create_post(&app.server, &alice, json!({ "title": "A draft", "content": "x" })).await;
    create_post(
        &app.server,
        &alice,
        json!({ "title": "A live", "content": "x", "status": "published" }),
    )
    .await;
    create_post(
        &app.server,
        &bob,
        json!({ "title": "B live", "content": "x", "status": "published" }),
    )
    .await;

    let all: Vec<Value> = app.server.get("/api/posts").await.json();
    assert_eq!(all.len(), 3);

    let published: Vec<Value> = app
        .server
        .get("/api/posts")
        .add_query_param("status", "published")
        .await
        .json();
    assert_eq!(published.len(), 2);
    assert!(published.iter().all(|p| p["status"] == "published"));
    assert!(published.iter().all(|p| !p["published_at"].is_null()));

    let by_alice: Vec<Value> = app
        .server
        .get("/api/posts")
        .add_query_param("author", &alice_id)
        .await
        .json();
    assert_eq!(by_alice.len(), 2);

    let limited: Vec<Value> = app
        .server
        .get("/api/posts")
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(limited.len(), 1);

    let bad = app
        .server
        .get("/api/posts")
        .add_query_param("status", "bogus")
        .await;
    assert_error_body!(bad, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_my_posts_only_lists_caller() {
    let app = spawn_app_without_generator().await;
    let (alice, alice_id) = register(&app.server, "mine-a@example.com").await;
    let (bob, _) = register(&app.server, "mine-b@example.com").await;

    create_post(&app.server, &alice, json!({ "title": "Alice 1", "content": "x" })).await;
    create_post(&app.server, &bob, json!({ "title": "Bob 1", "content": "x" })).await;

    let mine: Vec<Value> = app
        .server
        .get("/api/posts/mine")
        .authorization_bearer(&alice)
        .await
        .json();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["author_id"], alice_id.as_str());
}

#[tokio::test]
async fn test_update_post_author_only() {
    let app = spawn_app_without_generator().await;
    let (alice, _) = register(&app.server, "edit-a@example.com").await;
    let (bob, _) = register(&app.server, "edit-b@example.com").await;
    let post = create_post(&app.server, &alice, json!({ "title": "Draft", "content": "x" })).await;
    let path = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let response = app
        .server
        .put(&path)
        .authorization_bearer(&bob)
        .json(&json!({ "title": "Hijacked" }))
        .await;
    assert_error_body!(response, StatusCode::FORBIDDEN);

    let response = app
        .server
        .put(&path)
        .authorization_bearer(&alice)
        .json(&json!({ "title": "Final", "status": "published" }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["status"], "published");
    assert!(!updated["published_at"].is_null());
    assert_eq!(updated["slug"], post["slug"]);

    let response = app
        .server
        .put("/api/posts/missing")
        .authorization_bearer(&alice)
        .json(&json!({ "title": "x" }))
        .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_post_author_only() {
    let app = spawn_app_without_generator().await;
    let (alice, _) = register(&app.server, "del-a@example.com").await;
    let (bob, _) = register(&app.server, "del-b@example.com").await;
    let post = create_post(&app.server, &alice, json!({ "title": "Gone", "content": "x" })).await;
    let path = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let response = app.server.delete(&path).authorization_bearer(&bob).await;
    assert_error_body!(response, StatusCode::FORBIDDEN);

    let response = app.server.delete(&path).authorization_bearer(&alice).await;
    response.assert_status_ok();
    response.assert_json(&json!({ "message": "Post deleted successfully" }));

    let response = app.server.get(&path).await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_posts_survive_in_data_file() {
    let app = spawn_app_without_generator().await;
    let (token, _) = register(&app.server, "file@example.com").await;
    let post = create_post(&app.server, &token, json!({ "title": "Saved", "content": "x" })).await;

    let raw = std::fs::read_to_string(app.dir.path().join("blog_data.json")).unwrap();
    let document: Value = serde_json::from_str(&raw).unwrap();
    let id = post["id"].as_str().unwrap();
    assert_eq!(document["posts"][id]["title"], "Saved");
    assert_eq!(document["users"].as_object().unwrap().len(), 1);
}
