//! `SeaORM` implementation of the `PostService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::db::Store;
use crate::models::{Post, PostFilter, ReactionTarget, User};
use crate::services::authorization::require_owner_or_admin;
use crate::services::post_service::{PostError, PostQuery, PostService};

pub struct SeaOrmPostService {
    store: Store,
    default_category_id: i64,
}

impl SeaOrmPostService {
    #[must_use]
    pub const fn new(store: Store, default_category_id: i64) -> Self {
        Self {
            store,
            default_category_id,
        }
    }

    async fn fill_viewer_reaction(
        &self,
        post: &mut Post,
        viewer: Option<&User>,
    ) -> Result<(), PostError> {
        if let Some(user) = viewer {
            post.viewer_reaction = self
                .store
                .reaction_state(user.id, ReactionTarget::Post(post.id))
                .await?;
        }
        Ok(())
    }

    /// Owner lookup + ownership check shared by update and delete.
    async fn authorize_mutation(&self, acting: &User, post_id: i64) -> Result<(), PostError> {
        let owner = self
            .store
            .post_owner(post_id)
            .await?
            .ok_or(PostError::NotFound)?;

        require_owner_or_admin(owner, Some(acting))?;
        Ok(())
    }
}

fn validate_title_and_content(title: &str, content: &str) -> Result<(), PostError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(PostError::Validation(
            "Title and content cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl PostService for SeaOrmPostService {
    async fn create_post(
        &self,
        author: &User,
        title: &str,
        content: &str,
        category_ids: &[i64],
    ) -> Result<i64, PostError> {
        validate_title_and_content(title, content)?;

        let fallback = [self.default_category_id];
        let categories = if category_ids.is_empty() {
            &fallback[..]
        } else {
            category_ids
        };

        let now = Utc::now().to_rfc3339();
        let post_id = self
            .store
            .create_post(author.id, title.trim(), content.trim(), categories, &now)
            .await?;

        info!(post_id, user_id = author.id, "Post created");
        Ok(post_id)
    }

    async fn get_post(&self, post_id: i64, viewer: Option<&User>) -> Result<Post, PostError> {
        let mut post = self
            .store
            .get_post(post_id)
            .await?
            .ok_or(PostError::NotFound)?;

        self.fill_viewer_reaction(&mut post, viewer).await?;
        Ok(post)
    }

    async fn list_posts(
        &self,
        viewer: Option<&User>,
        query: PostQuery,
    ) -> Result<Vec<Post>, PostError> {
        let filter = PostFilter {
            category_id: query.category_id,
            author_id: viewer.filter(|_| query.mine).map(|u| u.id),
            liked_by: viewer.filter(|_| query.liked).map(|u| u.id),
        };

        let mut posts = self.store.list_posts(filter).await?;
        for post in &mut posts {
            self.fill_viewer_reaction(post, viewer).await?;
        }

        Ok(posts)
    }

    async fn update_post(
        &self,
        acting: &User,
        post_id: i64,
        title: &str,
        content: &str,
        category_ids: &[i64],
    ) -> Result<(), PostError> {
        self.authorize_mutation(acting, post_id).await?;
        validate_title_and_content(title, content)?;

        let updated = self
            .store
            .update_post(post_id, title.trim(), content.trim(), category_ids)
            .await?;

        if !updated {
            return Err(PostError::NotFound);
        }

        info!(post_id, user_id = acting.id, "Post updated");
        Ok(())
    }

    async fn delete_post(&self, acting: &User, post_id: i64) -> Result<(), PostError> {
        self.authorize_mutation(acting, post_id).await?;

        let deleted = self.store.delete_post_cascade(post_id).await?;
        if !deleted {
            return Err(PostError::NotFound);
        }

        info!(post_id, user_id = acting.id, "Post deleted with comments and reactions");
        Ok(())
    }
}
