//! `SeaORM` implementation of the `CommentService` trait.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use tracing::info;

use crate::db::Store;
use crate::models::{Comment, ReactionTarget, User};
use crate::services::authorization::require_owner_or_admin;
use crate::services::comment_service::{CommentError, CommentService};

pub struct SeaOrmCommentService {
    store: Store,
    /// Offset applied when formatting timestamps for display. Storage
    /// stays UTC; this is threaded in from config instead of living in
    /// a process-wide timezone singleton.
    display_offset: FixedOffset,
}

impl SeaOrmCommentService {
    #[must_use]
    pub fn new(store: Store, display_utc_offset_hours: i32) -> Self {
        let display_offset = FixedOffset::east_opt(display_utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));

        Self {
            store,
            display_offset,
        }
    }

    fn format_for_display(&self, stored: &str) -> String {
        DateTime::parse_from_rfc3339(stored).map_or_else(
            |_| stored.to_string(),
            |ts| ts.with_timezone(&self.display_offset).to_rfc3339(),
        )
    }

    async fn authorize_mutation(
        &self,
        acting: &User,
        comment_id: i64,
    ) -> Result<(), CommentError> {
        let owner = self
            .store
            .comment_owner(comment_id)
            .await?
            .ok_or(CommentError::NotFound)?;

        require_owner_or_admin(owner, Some(acting))?;
        Ok(())
    }
}

#[async_trait]
impl CommentService for SeaOrmCommentService {
    async fn add_comment(
        &self,
        author: &User,
        post_id: i64,
        content: &str,
    ) -> Result<i64, CommentError> {
        if content.trim().is_empty() {
            return Err(CommentError::Validation(
                "Comment cannot be empty".to_string(),
            ));
        }

        if !self.store.post_exists(post_id).await? {
            return Err(CommentError::PostNotFound);
        }

        let now = Utc::now().to_rfc3339();
        let comment_id = self
            .store
            .create_comment(post_id, author.id, content.trim(), &now)
            .await?;

        info!(comment_id, post_id, user_id = author.id, "Comment added");
        Ok(comment_id)
    }

    async fn list_for_post(
        &self,
        post_id: i64,
        viewer: Option<&User>,
    ) -> Result<Vec<Comment>, CommentError> {
        let mut comments = self.store.list_comments_for_post(post_id).await?;

        for comment in &mut comments {
            comment.created_at = self.format_for_display(&comment.created_at);

            if let Some(user) = viewer {
                comment.viewer_reaction = self
                    .store
                    .reaction_state(user.id, ReactionTarget::Comment(comment.id))
                    .await?;
            }
        }

        Ok(comments)
    }

    async fn update_comment(
        &self,
        acting: &User,
        comment_id: i64,
        content: &str,
    ) -> Result<(), CommentError> {
        self.authorize_mutation(acting, comment_id).await?;

        if content.trim().is_empty() {
            return Err(CommentError::Validation(
                "Comment cannot be empty".to_string(),
            ));
        }

        let updated = self.store.update_comment(comment_id, content.trim()).await?;
        if !updated {
            return Err(CommentError::NotFound);
        }

        info!(comment_id, user_id = acting.id, "Comment updated");
        Ok(())
    }

    async fn delete_comment(&self, acting: &User, comment_id: i64) -> Result<(), CommentError> {
        self.authorize_mutation(acting, comment_id).await?;

        let deleted = self.store.delete_comment(comment_id).await?;
        if !deleted {
            return Err(CommentError::NotFound);
        }

        info!(comment_id, user_id = acting.id, "Comment deleted");
        Ok(())
    }
}
