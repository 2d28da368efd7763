use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::{CurrentUser, MaybeUser};
use super::types::{
    CreatePostRequest, CreatedResponse, PostDetailDto, PostDto, UpdatePostRequest,
};
use super::{ApiError, ApiResponse, AppState};
use crate::services::PostQuery;

#[derive(Debug, Deserialize)]
pub struct ListPostsParams {
    pub category: Option<i64>,
    #[serde(default)]
    pub mine: bool,
    #[serde(default)]
    pub liked: bool,
}

/// GET /api/posts
/// Home listing, newest first. `mine` and `liked` only bite when the
/// caller is logged in; guests silently get the unfiltered view, as
/// the forum always behaved.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Query(params): Query<ListPostsParams>,
) -> Result<Json<ApiResponse<Vec<PostDto>>>, ApiError> {
    let query = PostQuery {
        category_id: params.category,
        mine: params.mine,
        liked: params.liked,
    };

    let posts = state
        .post_service()
        .list_posts(viewer.as_ref(), query)
        .await?;

    Ok(Json(ApiResponse::success(
        posts.into_iter().map(PostDto::from).collect(),
    )))
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = state
        .post_service()
        .create_post(&user, &payload.title, &payload.content, &payload.category_ids)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedResponse { id: post_id })),
    ))
}

/// GET /api/posts/{id}
/// One post with its comments; the viewer's own reaction state comes
/// along when logged in.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<PostDetailDto>>, ApiError> {
    let post = state
        .post_service()
        .get_post(post_id, viewer.as_ref())
        .await?;

    let comments = state
        .comment_service()
        .list_for_post(post_id, viewer.as_ref())
        .await?;

    Ok(Json(ApiResponse::success(PostDetailDto {
        post: PostDto::from(post),
        comments: comments.into_iter().map(Into::into).collect(),
    })))
}

/// PUT /api/posts/{id}, owner or admin only.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    state
        .post_service()
        .update_post(
            &user,
            post_id,
            &payload.title,
            &payload.content,
            &payload.category_ids,
        )
        .await?;

    Ok(Json(ApiResponse::success("Post updated")))
}

/// DELETE /api/posts/{id}, owner or admin only. Takes the post's comments,
/// reactions and category links with it.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    state.post_service().delete_post(&user, post_id).await?;

    Ok(Json(ApiResponse::success("Post deleted")))
}
