use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::extract::CurrentUser;
use super::types::{ReactionRequest, ReactionResponse};
use super::{ApiError, ApiResponse, AppState};
use crate::models::{ReactionKind, ReactionTarget};

fn parse_kind(raw: &str) -> Result<ReactionKind, ApiError> {
    raw.parse()
        .map_err(|()| ApiError::validation(format!("Invalid reaction type: {raw}")))
}

/// POST /api/posts/{id}/react
/// Toggle/switch the caller's reaction on a post; returns the fresh
/// counts for the client to render.
pub async fn react_to_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
    Json(payload): Json<ReactionRequest>,
) -> Result<Json<ApiResponse<ReactionResponse>>, ApiError> {
    let kind = parse_kind(&payload.kind)?;

    let counts = state
        .reaction_service()
        .react(&user, ReactionTarget::Post(post_id), kind)
        .await?;

    Ok(Json(ApiResponse::success(counts.into())))
}

/// POST /api/comments/{id}/react
pub async fn react_to_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(comment_id): Path<i64>,
    Json(payload): Json<ReactionRequest>,
) -> Result<Json<ApiResponse<ReactionResponse>>, ApiError> {
    let kind = parse_kind(&payload.kind)?;

    let counts = state
        .reaction_service()
        .react(&user, ReactionTarget::Comment(comment_id), kind)
        .await?;

    Ok(Json(ApiResponse::success(counts.into())))
}
