use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{comments, post_categories, posts, prelude::*, reactions};
use crate::models::{Post, PostFilter, ReactionKind, ReactionTarget};

use super::reaction::counts_on;

pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert the post and its category links in one transaction.
    /// Unknown category ids are dropped silently, matching the forum's
    /// tolerant category handling.
    pub async fn create(
        &self,
        user_id: i64,
        title: &str,
        content: &str,
        category_ids: &[i64],
        now: &str,
    ) -> Result<i64> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open post-create transaction")?;

        let inserted = Posts::insert(posts::ActiveModel {
            user_id: Set(user_id),
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            created_at: Set(now.to_string()),
            ..Default::default()
        })
        .exec(&txn)
        .await
        .context("Failed to insert post")?;

        let post_id = inserted.last_insert_id;
        link_categories(&txn, post_id, category_ids).await?;

        txn.commit()
            .await
            .context("Failed to commit post create")?;

        Ok(post_id)
    }

    /// Update title/content and replace the category set atomically.
    /// Returns false when the post does not exist.
    pub async fn update(
        &self,
        post_id: i64,
        title: &str,
        content: &str,
        category_ids: &[i64],
    ) -> Result<bool> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open post-update transaction")?;

        let Some(post) = Posts::find_by_id(post_id)
            .one(&txn)
            .await
            .context("Failed to load post for update")?
        else {
            return Ok(false);
        };

        let mut active: posts::ActiveModel = post.into();
        active.title = Set(title.to_string());
        active.content = Set(content.to_string());
        active
            .update(&txn)
            .await
            .context("Failed to update post")?;

        PostCategories::delete_many()
            .filter(post_categories::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .context("Failed to clear old category links")?;

        link_categories(&txn, post_id, category_ids).await?;

        txn.commit()
            .await
            .context("Failed to commit post update")?;

        Ok(true)
    }

    /// Delete a post and everything hanging off it (comment reactions,
    /// post reactions, comments, category links) in one transaction.
    /// Nothing is orphaned and nothing goes half-way.
    pub async fn delete_cascade(&self, post_id: i64) -> Result<bool> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open post-delete transaction")?;

        if Posts::find_by_id(post_id)
            .one(&txn)
            .await
            .context("Failed to load post for delete")?
            .is_none()
        {
            return Ok(false);
        }

        let comment_ids: Vec<i64> = Comments::find()
            .filter(comments::Column::PostId.eq(post_id))
            .all(&txn)
            .await
            .context("Failed to list comments for delete")?
            .into_iter()
            .map(|c| c.id)
            .collect();

        if !comment_ids.is_empty() {
            Reactions::delete_many()
                .filter(reactions::Column::CommentId.is_in(comment_ids))
                .exec(&txn)
                .await
                .context("Failed to delete comment reactions")?;
        }

        Reactions::delete_many()
            .filter(reactions::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .context("Failed to delete post reactions")?;

        Comments::delete_many()
            .filter(comments::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .context("Failed to delete comments")?;

        PostCategories::delete_many()
            .filter(post_categories::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .context("Failed to delete category links")?;

        Posts::delete_by_id(post_id)
            .exec(&txn)
            .await
            .context("Failed to delete post")?;

        txn.commit()
            .await
            .context("Failed to commit post delete")?;

        Ok(true)
    }

    pub async fn get(&self, post_id: i64) -> Result<Option<Post>> {
        let Some((post, author)) = Posts::find_by_id(post_id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query post")?
        else {
            return Ok(None);
        };

        Ok(Some(self.hydrate(post, author).await?))
    }

    /// Posts newest-first, optionally narrowed by category, author or
    /// "liked by". These are the home-page filters.
    pub async fn list(&self, filter: PostFilter) -> Result<Vec<Post>> {
        let mut query = Posts::find()
            .find_also_related(Users)
            .order_by_desc(posts::Column::CreatedAt);

        if let Some(category_id) = filter.category_id {
            query = query.filter(
                posts::Column::Id.in_subquery(
                    Query::select()
                        .column(post_categories::Column::PostId)
                        .from(PostCategories)
                        .and_where(
                            Expr::col(post_categories::Column::CategoryId).eq(category_id),
                        )
                        .to_owned(),
                ),
            );
        }

        if let Some(author_id) = filter.author_id {
            query = query.filter(posts::Column::UserId.eq(author_id));
        }

        if let Some(user_id) = filter.liked_by {
            query = query.filter(
                posts::Column::Id.in_subquery(
                    Query::select()
                        .column(reactions::Column::PostId)
                        .from(Reactions)
                        .and_where(Expr::col(reactions::Column::UserId).eq(user_id))
                        .and_where(
                            Expr::col(reactions::Column::Kind).eq(ReactionKind::Like.as_str()),
                        )
                        .to_owned(),
                ),
            );
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list posts")?;

        let mut posts = Vec::with_capacity(rows.len());
        for (post, author) in rows {
            posts.push(self.hydrate(post, author).await?);
        }

        Ok(posts)
    }

    pub async fn owner_of(&self, post_id: i64) -> Result<Option<i64>> {
        let post = Posts::find_by_id(post_id)
            .one(&self.conn)
            .await
            .context("Failed to query post owner")?;

        Ok(post.map(|p| p.user_id))
    }

    pub async fn exists(&self, post_id: i64) -> Result<bool> {
        let count = Posts::find_by_id(post_id)
            .count(&self.conn)
            .await
            .context("Failed to check post existence")?;

        Ok(count > 0)
    }

    /// Attach author name, category names, reaction counts and comment
    /// count to a raw row. The viewer's own reaction state is filled in
    /// by the service layer, which knows who is asking.
    async fn hydrate(
        &self,
        post: posts::Model,
        author: Option<crate::entities::users::Model>,
    ) -> Result<Post> {
        let username = author
            .map(|u| u.username)
            .ok_or_else(|| anyhow::anyhow!("post {} has no author row", post.id))?;

        let categories = Categories::find()
            .inner_join(PostCategories)
            .filter(post_categories::Column::PostId.eq(post.id))
            .all(&self.conn)
            .await
            .context("Failed to load post categories")?
            .into_iter()
            .map(|c| c.name)
            .collect();

        let counts = counts_on(&self.conn, ReactionTarget::Post(post.id)).await?;

        let comment_count = Comments::find()
            .filter(comments::Column::PostId.eq(post.id))
            .count(&self.conn)
            .await
            .context("Failed to count comments")?;

        Ok(Post {
            id: post.id,
            user_id: post.user_id,
            username,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
            categories,
            likes: counts.likes,
            dislikes: counts.dislikes,
            comment_count,
            viewer_reaction: None,
        })
    }
}

/// Insert category links for a post, keeping only ids that actually
/// exist. The connection may be a transaction.
async fn link_categories<C: ConnectionTrait>(
    conn: &C,
    post_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let valid = Categories::find()
        .filter(crate::entities::categories::Column::Id.is_in(category_ids.to_vec()))
        .all(conn)
        .await
        .context("Failed to validate category ids")?;

    if valid.is_empty() {
        return Ok(());
    }

    let links: Vec<post_categories::ActiveModel> = valid
        .into_iter()
        .map(|category| post_categories::ActiveModel {
            post_id: Set(post_id),
            category_id: Set(category.id),
        })
        .collect();

    PostCategories::insert_many(links)
        .exec(conn)
        .await
        .context("Failed to insert category links")?;

    Ok(())
}
