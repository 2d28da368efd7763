use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::extract::MaybeUser;
use super::types::{CategoryDto, PostDto};
use super::{ApiError, ApiResponse, AppState};
use crate::services::PostQuery;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>, ApiError> {
    let categories = state.store().list_categories().await?;

    Ok(Json(ApiResponse::success(
        categories.into_iter().map(CategoryDto::from).collect(),
    )))
}

/// GET /api/categories/{id}/posts
pub async fn posts_in_category(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Path(category_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<PostDto>>>, ApiError> {
    if state.store().get_category(category_id).await?.is_none() {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    let posts = state
        .post_service()
        .list_posts(
            viewer.as_ref(),
            PostQuery {
                category_id: Some(category_id),
                ..PostQuery::default()
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(
        posts.into_iter().map(PostDto::from).collect(),
    )))
}
