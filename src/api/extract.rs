//! Request extractors resolving the session cookie to an identity.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::constants::session::COOKIE_NAME;
use crate::models::User;

/// Extractor that requires a live session. Rejects with 401 when the
/// cookie is missing, unknown or expired; "not logged in" is never an
/// internal error.
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token_from_headers(&parts.headers) else {
            return Err(ApiError::Unauthorized("Not authenticated".to_string()));
        };
        let token = token.to_string();

        let user = state
            .auth_service()
            .current_user(&token)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        tracing::Span::current().record("user_id", user.id);

        Ok(Self(user))
    }
}

/// Optional identity: `None` instead of 401 for guests.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(CurrentUser(user)) => Ok(Self(Some(user))),
            Err(ApiError::Unauthorized(_)) => Ok(Self(None)),
            Err(other) => Err(other),
        }
    }
}

/// Pull the session token out of the Cookie header(s).
pub(crate) fn session_token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(str::trim)
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == COOKIE_NAME { Some(val) } else { None }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_token=abc123; lang=en"),
        );

        assert_eq!(session_token_from_headers(&headers), Some("abc123"));
    }

    #[test]
    fn missing_cookie_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(session_token_from_headers(&headers), None);
    }

    #[test]
    fn other_cookies_do_not_match() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_token_old=zzz"),
        );

        assert_eq!(session_token_from_headers(&headers), None);
    }
}
