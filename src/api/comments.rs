use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::extract::CurrentUser;
use super::types::{AddCommentRequest, CreatedResponse, UpdateCommentRequest};
use super::{ApiError, ApiResponse, AppState};

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
    Json(payload): Json<AddCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment_id = state
        .comment_service()
        .add_comment(&user, post_id, &payload.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedResponse { id: comment_id })),
    ))
}

/// PUT /api/comments/{id}, owner or admin only.
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(comment_id): Path<i64>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    state
        .comment_service()
        .update_comment(&user, comment_id, &payload.content)
        .await?;

    Ok(Json(ApiResponse::success("Comment updated")))
}

/// DELETE /api/comments/{id}, owner or admin only.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(comment_id): Path<i64>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    state
        .comment_service()
        .delete_comment(&user, comment_id)
        .await?;

    Ok(Json(ApiResponse::success("Comment deleted")))
}
