//! Domain service for posts: creation, listing, editing, cascade
//! deletion, with ownership checks on every mutation.

use thiserror::Error;

use crate::models::{Post, User};
use crate::services::authorization::AccessError;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("Post not found")]
    NotFound,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not allowed to modify this post")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for PostError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AccessError> for PostError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthorized => Self::Unauthorized,
            AccessError::Forbidden => Self::Forbidden,
        }
    }
}

/// Listing toggles as the caller sees them. `mine` and `liked` only
/// have an effect for a logged-in viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostQuery {
    pub category_id: Option<i64>,
    pub mine: bool,
    pub liked: bool,
}

#[async_trait::async_trait]
pub trait PostService: Send + Sync {
    /// Create a post owned by `author`. Posts with no category land in
    /// the default one.
    async fn create_post(
        &self,
        author: &User,
        title: &str,
        content: &str,
        category_ids: &[i64],
    ) -> Result<i64, PostError>;

    /// Fetch one post with counts, categories and, for a logged-in
    /// viewer, that viewer's own reaction state.
    async fn get_post(&self, post_id: i64, viewer: Option<&User>) -> Result<Post, PostError>;

    async fn list_posts(
        &self,
        viewer: Option<&User>,
        query: PostQuery,
    ) -> Result<Vec<Post>, PostError>;

    /// Owner or admin only.
    async fn update_post(
        &self,
        acting: &User,
        post_id: i64,
        title: &str,
        content: &str,
        category_ids: &[i64],
    ) -> Result<(), PostError>;

    /// Owner or admin only. Removes the post's comments, reactions and
    /// category links with it.
    async fn delete_post(&self, acting: &User, post_id: i64) -> Result<(), PostError>;
}
