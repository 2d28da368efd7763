//! Auth and end-to-end flows driven through the router.

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
    // cheap argon2 params keep the suite fast
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

async fn register(app: &Router, email: &str, username: &str) -> Response<Body> {
    request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": email, "username": username, "password": "hunter2secret"})),
    )
    .await
}

async fn login(app: &Router, email: &str) -> Response<Body> {
    request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": "hunter2secret"})),
    )
    .await
}

#[tokio::test]
async fn first_user_is_admin_second_is_not() {
    let app = spawn_app().await;

    let response = register(&app, "first@example.com", "first").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["is_admin"], true);

    let response = register(&app, "second@example.com", "second").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["is_admin"], false);
}

#[tokio::test]
async fn duplicate_email_and_username_conflict() {
    let app = spawn_app().await;

    register(&app, "alice@example.com", "alice").await;

    let response = register(&app, "alice@example.com", "alice2").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = register(&app, "alice2@example.com", "alice").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_login_is_generic_for_unknown_email_and_wrong_password() {
    let app = spawn_app().await;

    register(&app, "carol@example.com", "carol").await;

    // wrong password for a real account
    let response = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "carol@example.com", "password": "not-the-password"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = json_body(response).await;

    // account that does not exist at all
    let response = login(&app, "nobody@example.com").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let unknown_email = json_body(response).await;

    // the two failures must be indistinguishable
    assert_eq!(wrong_password["error"], unknown_email["error"]);
}

#[tokio::test]
async fn login_sets_session_cookie_with_contracted_attributes() {
    let app = spawn_app().await;

    register(&app, "dave@example.com", "dave").await;
    let response = login(&app, "dave@example.com").await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap();

    assert!(set_cookie.starts_with("session_token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Expires="));
}

#[tokio::test]
async fn me_requires_a_live_session() {
    let app = spawn_app().await;

    let response = request(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    register(&app, "erin@example.com", "erin").await;
    let cookie = session_cookie(&login(&app, "erin@example.com").await);

    let response = request(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["username"], "erin");
}

#[tokio::test]
async fn logout_clears_cookie_and_invalidates_session() {
    let app = spawn_app().await;

    register(&app, "frank@example.com", "frank").await;
    let cookie = session_cookie(&login(&app, "frank@example.com").await);

    let response = request(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("logout must clear the cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("session_token=;"));
    assert!(set_cookie.contains("Max-Age=0"));

    // the token is gone server-side too
    let response = request(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // logging out again is fine
    let response = request(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_with_remember_issues_session_immediately() {
    let app = spawn_app().await;

    let response = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "grace@example.com",
            "username": "grace",
            "password": "hunter2secret",
            "remember": true
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = session_cookie(&response);
    let response = request(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = spawn_app().await;

    let response = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "short@example.com", "username": "short", "password": "abc"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// The full scenario: A registers (admin), logs in, posts; B registers,
/// likes, un-likes, dislikes; A deletes the post and everything hanging
/// off it disappears.
#[tokio::test]
async fn end_to_end_forum_lifecycle() {
    let app = spawn_app().await;

    register(&app, "a@example.com", "user_a").await;
    let cookie_a = session_cookie(&login(&app, "a@example.com").await);

    let response = request(
        &app,
        "POST",
        "/api/posts",
        Some(&cookie_a),
        Some(json!({"title": "Hello forum", "content": "First post"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let post_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    register(&app, "b@example.com", "user_b").await;
    let cookie_b = session_cookie(&login(&app, "b@example.com").await);

    let react_uri = format!("/api/posts/{post_id}/react");

    // B likes P
    let response = request(
        &app,
        "POST",
        &react_uri,
        Some(&cookie_b),
        Some(json!({"type": "like"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["likes"], 1);
    assert_eq!(body["data"]["dislikes"], 0);

    // B likes P again: toggle off
    let body = json_body(
        request(
            &app,
            "POST",
            &react_uri,
            Some(&cookie_b),
            Some(json!({"type": "like"})),
        )
        .await,
    )
    .await;
    assert_eq!(body["data"]["likes"], 0);
    assert_eq!(body["data"]["dislikes"], 0);

    // B dislikes P
    let body = json_body(
        request(
            &app,
            "POST",
            &react_uri,
            Some(&cookie_b),
            Some(json!({"type": "dislike"})),
        )
        .await,
    )
    .await;
    assert_eq!(body["data"]["likes"], 0);
    assert_eq!(body["data"]["dislikes"], 1);

    // A deletes P
    let response = request(
        &app,
        "DELETE",
        &format!("/api/posts/{post_id}"),
        Some(&cookie_a),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // P is gone
    let response = request(&app, "GET", &format!("/api/posts/{post_id}"), None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // and so is B's reaction target
    let response = request(
        &app,
        "POST",
        &react_uri,
        Some(&cookie_b),
        Some(json!({"type": "like"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
