//! Post listing filters, categories and the post detail view.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use agora::config::Config;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = agora::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    agora::api::router(state).await
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

#[tokio::test]
async fn seeded_categories_are_listed() {
    let app = spawn_app().await;

    let response = request(&app, "GET", "/api/categories", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();

    assert!(names.contains(&"General"));
    assert!(names.len() >= 4);
}

#[tokio::test]
async fn post_without_category_lands_in_general() {
    let app = spawn_app().await;
    let cookie = register_and_login(&app, "p1@example.com", "p1").await;

    let response = request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie),
        Some(json!({"title": "No category chosen", "content": "text"})),
    )
    .await;
    let post_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    let body = json_body(request(&app, "GET", &format!("/api/posts/{post_id}"), None, None).await)
        .await;
    assert_eq!(body["data"]["categories"], json!(["General"]));
}

#[tokio::test]
async fn category_filter_narrows_the_listing() {
    let app = spawn_app().await;
    let cookie = register_and_login(&app, "p2@example.com", "p2").await;

    // category 2 exists from the seed
    request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie),
        Some(json!({"title": "Tech post", "content": "x", "category_ids": [2]})),
    )
    .await;
    request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie),
        Some(json!({"title": "General post", "content": "y"})),
    )
    .await;

    let body = json_body(request(&app, "GET", "/api/posts?category=2", None, None).await).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Tech post"]);

    let body =
        json_body(request(&app, "GET", "/api/categories/2/posts", None, None).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = request(&app, "GET", "/api/categories/9999/posts", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mine_and_liked_filters_follow_the_viewer() {
    let app = spawn_app().await;
    let cookie_a = register_and_login(&app, "pa@example.com", "pa").await;
    let cookie_b = register_and_login(&app, "pb@example.com", "pb").await;

    let response = request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie_a),
        Some(json!({"title": "A's post", "content": "x"})),
    )
    .await;
    let a_post = json_body(response).await["data"]["id"].as_i64().unwrap();

    request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie_b),
        Some(json!({"title": "B's post", "content": "y"})),
    )
    .await;

    // B likes A's post
    request(
        &app,
        "POST",
        &format!("/api/posts/{a_post}/react"),
        Some(&cookie_b),
        Some(json!({"type": "like"})),
    )
    .await;

    let body =
        json_body(request(&app, "GET", "/api/posts?mine=true", Some(&cookie_b), None).await).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B's post"]);

    let body =
        json_body(request(&app, "GET", "/api/posts?liked=true", Some(&cookie_b), None).await)
            .await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A's post"]);

    // guests silently get everything
    let body = json_body(request(&app, "GET", "/api/posts?mine=true", None, None).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn post_detail_carries_comments_and_viewer_state() {
    let app = spawn_app().await;
    let cookie = register_and_login(&app, "pd@example.com", "pd").await;

    let response = request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie),
        Some(json!({"title": "Detailed", "content": "z"})),
    )
    .await;
    let post_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    request(
        &app,
        "POST",
        &format!("/api/posts/{post_id}/comments"),
        Some(&cookie),
        Some(json!({"content": "first!"})),
    )
    .await;
    request(
        &app,
        "POST",
        &format!("/api/posts/{post_id}/react"),
        Some(&cookie),
        Some(json!({"type": "like"})),
    )
    .await;

    let body = json_body(
        request(
            &app,
            "GET",
            &format!("/api/posts/{post_id}"),
            Some(&cookie),
            None,
        )
        .await,
    )
    .await;

    assert_eq!(body["data"]["comment_count"], 1);
    assert_eq!(body["data"]["viewer_liked"], true);
    assert_eq!(body["data"]["viewer_disliked"], false);
    assert_eq!(body["data"]["comments"][0]["content"], "first!");
    assert_eq!(body["data"]["comments"][0]["username"], "pd");

    // a guest sees the counts but no personal state
    let body = json_body(request(&app, "GET", &format!("/api/posts/{post_id}"), None, None).await)
        .await;
    assert_eq!(body["data"]["likes"], 1);
    assert_eq!(body["data"]["viewer_liked"], false);
}

#[tokio::test]
async fn updating_a_post_replaces_its_categories() {
    let app = spawn_app().await;
    let cookie = register_and_login(&app, "pe@example.com", "pe").await;

    let response = request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie),
        Some(json!({"title": "Movable", "content": "c", "category_ids": [2]})),
    )
    .await;
    let post_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    let response = request(
        &app,
        "PUT",
        &format!("/api/posts/{post_id}"),
        Some(&cookie),
        Some(json!({"title": "Moved", "content": "c", "category_ids": [3]})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(request(&app, "GET", &format!("/api/posts/{post_id}"), None, None).await)
        .await;
    assert_eq!(body["data"]["title"], "Moved");

    let categories = body["data"]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_ne!(categories[0], "Technology");
}

#[tokio::test]
async fn empty_title_or_content_is_rejected() {
    let app = spawn_app().await;
    let cookie = register_and_login(&app, "pf@example.com", "pf").await;

    let response = request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie),
        Some(json!({"title": "   ", "content": "body"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie),
        Some(json!({"title": "title", "content": ""})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
