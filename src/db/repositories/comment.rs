use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::{comments, prelude::*, reactions};
use crate::models::{Comment, ReactionTarget};

use super::reaction::counts_on;

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        post_id: i64,
        user_id: i64,
        content: &str,
        now: &str,
    ) -> Result<i64> {
        let inserted = Comments::insert(comments::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
            content: Set(content.to_string()),
            created_at: Set(now.to_string()),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("Failed to insert comment")?;

        Ok(inserted.last_insert_id)
    }

    pub async fn owner_of(&self, comment_id: i64) -> Result<Option<i64>> {
        let comment = Comments::find_by_id(comment_id)
            .one(&self.conn)
            .await
            .context("Failed to query comment owner")?;

        Ok(comment.map(|c| c.user_id))
    }

    pub async fn get(&self, comment_id: i64) -> Result<Option<comments::Model>> {
        Comments::find_by_id(comment_id)
            .one(&self.conn)
            .await
            .context("Failed to query comment")
    }

    pub async fn update_content(&self, comment_id: i64, content: &str) -> Result<bool> {
        let Some(comment) = Comments::find_by_id(comment_id)
            .one(&self.conn)
            .await
            .context("Failed to load comment for update")?
        else {
            return Ok(false);
        };

        let mut active: comments::ActiveModel = comment.into();
        active.content = Set(content.to_string());
        active
            .update(&self.conn)
            .await
            .context("Failed to update comment")?;

        Ok(true)
    }

    /// Delete a comment together with its reactions, atomically.
    pub async fn delete(&self, comment_id: i64) -> Result<bool> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open comment-delete transaction")?;

        if Comments::find_by_id(comment_id)
            .one(&txn)
            .await
            .context("Failed to load comment for delete")?
            .is_none()
        {
            return Ok(false);
        }

        Reactions::delete_many()
            .filter(reactions::Column::CommentId.eq(comment_id))
            .exec(&txn)
            .await
            .context("Failed to delete comment reactions")?;

        Comments::delete_by_id(comment_id)
            .exec(&txn)
            .await
            .context("Failed to delete comment")?;

        txn.commit()
            .await
            .context("Failed to commit comment delete")?;

        Ok(true)
    }

    /// Comments for a post, newest first, with author names and
    /// reaction counts. Viewer reaction state is filled by the service.
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let rows = Comments::find()
            .filter(comments::Column::PostId.eq(post_id))
            .order_by_desc(comments::Column::CreatedAt)
            .find_also_related(Users)
            .all(&self.conn)
            .await
            .context("Failed to list comments")?;

        let mut comments = Vec::with_capacity(rows.len());
        for (comment, author) in rows {
            let username = author
                .map(|u| u.username)
                .ok_or_else(|| anyhow::anyhow!("comment {} has no author row", comment.id))?;

            let counts = counts_on(&self.conn, ReactionTarget::Comment(comment.id)).await?;

            comments.push(Comment {
                id: comment.id,
                post_id: comment.post_id,
                user_id: comment.user_id,
                username,
                content: comment.content,
                created_at: comment.created_at,
                likes: counts.likes,
                dislikes: counts.dislikes,
                viewer_reaction: None,
            });
        }

        Ok(comments)
    }
}
