//! Reaction ledger invariants: toggle, switch, uniqueness, cascade.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use agora::config::Config;
use agora::models::ReactionTarget;

async fn spawn_app() -> (Arc<agora::api::AppState>, Router) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = agora::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let router = agora::api::router(Arc::clone(&state)).await;
    (state, router)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing Set-Cookie header")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn register_and_login(app: &Router, email: &str, username: &str) -> String {
    request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": email, "username": username, "password": "hunter2secret"})),
    )
    .await;

    let response = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": "hunter2secret"})),
    )
    .await;
    session_cookie(&response)
}

async fn create_post(app: &Router, cookie: &str) -> i64 {
    let response = request(
        app,
        "POST",
        "/api/posts",
        Some(cookie),
        Some(json!({"title": "A post", "content": "Some content"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["data"]["id"].as_i64().unwrap()
}

async fn react(
    app: &Router,
    cookie: &str,
    uri: &str,
    kind: &str,
) -> (StatusCode, serde_json::Value) {
    let response = request(app, "POST", uri, Some(cookie), Some(json!({"type": kind}))).await;
    let status = response.status();
    (status, json_body(response).await)
}

#[tokio::test]
async fn like_toggles_off_on_second_click() {
    let (_, app) = spawn_app().await;
    let cookie = register_and_login(&app, "u1@example.com", "u1").await;
    let post_id = create_post(&app, &cookie).await;
    let uri = format!("/api/posts/{post_id}/react");

    let (status, body) = react(&app, &cookie, &uri, "like").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["likes"], 1);

    let (_, body) = react(&app, &cookie, &uri, "like").await;
    assert_eq!(body["data"]["likes"], 0);
    assert_eq!(body["data"]["dislikes"], 0);
}

#[tokio::test]
async fn switching_reaction_never_double_counts() {
    let (state, app) = spawn_app().await;
    let cookie = register_and_login(&app, "u2@example.com", "u2").await;
    let post_id = create_post(&app, &cookie).await;
    let uri = format!("/api/posts/{post_id}/react");

    react(&app, &cookie, &uri, "like").await;
    let (_, body) = react(&app, &cookie, &uri, "dislike").await;

    assert_eq!(body["data"]["likes"], 0);
    assert_eq!(body["data"]["dislikes"], 1);

    // ledger level: exactly one row for the pair
    let counts = state
        .store()
        .reaction_counts(ReactionTarget::Post(post_id))
        .await
        .unwrap();
    assert_eq!(counts.likes + counts.dislikes, 1);
}

#[tokio::test]
async fn reactions_from_different_users_are_independent() {
    let (_, app) = spawn_app().await;
    let cookie_a = register_and_login(&app, "a@example.com", "a").await;
    let cookie_b = register_and_login(&app, "b@example.com", "b").await;
    let post_id = create_post(&app, &cookie_a).await;
    let uri = format!("/api/posts/{post_id}/react");

    react(&app, &cookie_a, &uri, "like").await;
    let (_, body) = react(&app, &cookie_b, &uri, "like").await;

    assert_eq!(body["data"]["likes"], 2);

    // one user backing out leaves the other's reaction alone
    let (_, body) = react(&app, &cookie_a, &uri, "like").await;
    assert_eq!(body["data"]["likes"], 1);
}

#[tokio::test]
async fn invalid_kind_is_rejected_before_the_ledger() {
    let (_, app) = spawn_app().await;
    let cookie = register_and_login(&app, "u3@example.com", "u3").await;
    let post_id = create_post(&app, &cookie).await;

    let (status, _) = react(
        &app,
        &cookie,
        &format!("/api/posts/{post_id}/react"),
        "love",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reacting_requires_authentication() {
    let (_, app) = spawn_app().await;
    let cookie = register_and_login(&app, "u4@example.com", "u4").await;
    let post_id = create_post(&app, &cookie).await;

    let response = request(
        &app,
        "POST",
        &format!("/api/posts/{post_id}/react"),
        None,
        Some(json!({"type": "like"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reacting_to_missing_target_is_not_found() {
    let (_, app) = spawn_app().await;
    let cookie = register_and_login(&app, "u5@example.com", "u5").await;

    let (status, _) = react(&app, &cookie, "/api/posts/9999/react", "like").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = react(&app, &cookie, "/api/comments/9999/react", "dislike").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_reactions_follow_the_same_state_machine() {
    let (_, app) = spawn_app().await;
    let cookie = register_and_login(&app, "u6@example.com", "u6").await;
    let post_id = create_post(&app, &cookie).await;

    let response = request(
        &app,
        "POST",
        &format!("/api/posts/{post_id}/comments"),
        Some(&cookie),
        Some(json!({"content": "nice post"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/comments/{comment_id}/react");

    let (_, body) = react(&app, &cookie, &uri, "dislike").await;
    assert_eq!(body["data"]["dislikes"], 1);

    let (_, body) = react(&app, &cookie, &uri, "like").await;
    assert_eq!(body["data"]["likes"], 1);
    assert_eq!(body["data"]["dislikes"], 0);

    let (_, body) = react(&app, &cookie, &uri, "like").await;
    assert_eq!(body["data"]["likes"], 0);
    assert_eq!(body["data"]["dislikes"], 0);
}

#[tokio::test]
async fn deleting_a_post_cascades_to_comments_and_reactions() {
    let (state, app) = spawn_app().await;
    let cookie_a = register_and_login(&app, "owner@example.com", "owner").await;
    let cookie_b = register_and_login(&app, "fan@example.com", "fan").await;

    let post_id = create_post(&app, &cookie_a).await;

    let response = request(
        &app,
        "POST",
        &format!("/api/posts/{post_id}/comments"),
        Some(&cookie_b),
        Some(json!({"content": "a comment"})),
    )
    .await;
    let comment_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    react(&app, &cookie_b, &format!("/api/posts/{post_id}/react"), "like").await;
    react(
        &app,
        &cookie_a,
        &format!("/api/comments/{comment_id}/react"),
        "like",
    )
    .await;

    let response = request(
        &app,
        "DELETE",
        &format!("/api/posts/{post_id}"),
        Some(&cookie_a),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // no orphans: comment, post reactions and comment reactions all gone
    assert!(state.store().get_comment(comment_id).await.unwrap().is_none());

    let post_counts = state
        .store()
        .reaction_counts(ReactionTarget::Post(post_id))
        .await
        .unwrap();
    assert_eq!(post_counts.likes + post_counts.dislikes, 0);

    let comment_counts = state
        .store()
        .reaction_counts(ReactionTarget::Comment(comment_id))
        .await
        .unwrap();
    assert_eq!(comment_counts.likes + comment_counts.dislikes, 0);
}
