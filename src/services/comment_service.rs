//! Domain service for comments.

use thiserror::Error;

use crate::models::{Comment, User};
use crate::services::authorization::AccessError;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Comment not found")]
    NotFound,

    #[error("Post not found")]
    PostNotFound,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not allowed to modify this comment")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for CommentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AccessError> for CommentError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthorized => Self::Unauthorized,
            AccessError::Forbidden => Self::Forbidden,
        }
    }
}

#[async_trait::async_trait]
pub trait CommentService: Send + Sync {
    /// Attach a comment to an existing post.
    ///
    /// # Errors
    ///
    /// Returns [`CommentError::PostNotFound`] when the post is gone and
    /// [`CommentError::Validation`] for empty content.
    async fn add_comment(
        &self,
        author: &User,
        post_id: i64,
        content: &str,
    ) -> Result<i64, CommentError>;

    /// Comments for a post, newest first. Timestamps are formatted in
    /// the configured display offset; a viewer gets their own reaction
    /// state per comment.
    async fn list_for_post(
        &self,
        post_id: i64,
        viewer: Option<&User>,
    ) -> Result<Vec<Comment>, CommentError>;

    /// Owner or admin only.
    async fn update_comment(
        &self,
        acting: &User,
        comment_id: i64,
        content: &str,
    ) -> Result<(), CommentError>;

    /// Owner or admin only. The comment's reactions go with it.
    async fn delete_comment(&self, acting: &User, comment_id: i64) -> Result<(), CommentError>;
}
