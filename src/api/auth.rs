use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum::extract::State;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::extract::{CurrentUser, session_token_from_headers};
use super::{ApiError, ApiResponse, AppState};
use crate::constants::session::COOKIE_NAME;
use crate::services::SessionHandle;
use crate::api::types::{LoginRequest, RegisterRequest, RegisterResponse, UserDto};

// ============================================================================
// Cookie helpers
// ============================================================================

/// `Expires` wants an HTTP-date; chrono's `Utc` formats the English
/// names this needs regardless of locale.
fn http_date(ts: DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn session_cookie(session: &SessionHandle, secure: bool) -> String {
    let mut cookie = format!(
        "{COOKIE_NAME}={}; HttpOnly; Path=/; SameSite=Lax; Expires={}",
        session.token,
        http_date(session.expires_at)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Empty value, immediately expired, so the browser drops the cookie.
fn clear_session_cookie(secure: bool) -> String {
    let mut cookie =
        format!("{COOKIE_NAME}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn append_cookie(response: &mut Response, cookie: &str) -> Result<(), ApiError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| ApiError::internal(format!("Invalid cookie header: {e}")))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register
/// Create an account; with `remember` the response also carries a
/// 30-day session cookie.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .auth_service()
        .register(
            &payload.email,
            &payload.username,
            &payload.password,
            payload.remember,
        )
        .await?;

    let secure = state.secure_cookies();
    let body = RegisterResponse {
        user_id: result.user.id,
        username: result.user.username,
        is_admin: result.user.is_admin,
    };

    let mut response =
        (StatusCode::CREATED, Json(ApiResponse::success(body))).into_response();

    if let Some(session) = &result.session {
        append_cookie(&mut response, &session_cookie(session, secure))?;
    }

    Ok(response)
}

/// POST /api/auth/login
/// Verify credentials and set the session cookie. Issuing the session
/// invalidates every earlier one for the user.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let (user, session) = state
        .auth_service()
        .login(&payload.email, &payload.password, payload.remember)
        .await?;

    let secure = state.secure_cookies();

    let mut response = Json(ApiResponse::success(UserDto::from(user))).into_response();
    append_cookie(&mut response, &session_cookie(&session, secure))?;

    Ok(response)
}

/// POST /api/auth/logout
/// Revoke the session (if any) and clear the cookie. Always succeeds
/// from the caller's perspective.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = session_token_from_headers(&headers) {
        let token = token.to_string();
        state.auth_service().logout(&token).await?;
    }

    let secure = state.secure_cookies();

    let mut response =
        (StatusCode::OK, Json(ApiResponse::success("Logged out"))).into_response();
    append_cookie(&mut response, &clear_session_cookie(secure))?;

    Ok(response)
}

/// GET /api/auth/me
/// Current user, or 401 when no live session accompanies the request.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(UserDto::from(user)))
}
