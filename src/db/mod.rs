use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::NewUserError;

use crate::models::{
    Category, Comment, Post, PostFilter, ReactionCounts, ReactionKind, ReactionTarget, User,
};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with("sqlite::memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> repositories::post::PostRepository {
        repositories::post::PostRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    fn reaction_repo(&self) -> repositories::reaction::ReactionRepository {
        repositories::reaction::ReactionRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
        now: &str,
    ) -> Result<User, NewUserError> {
        self.user_repo()
            .create(email, username, password_hash, now)
            .await
    }

    pub async fn get_user_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_email_with_password(email).await
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn user_count(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ========== Sessions ==========

    pub async fn replace_sessions_for_user(
        &self,
        user_id: i64,
        token: &str,
        expires_at: &str,
    ) -> Result<()> {
        self.session_repo()
            .replace_for_user(user_id, token, expires_at)
            .await
    }

    pub async fn resolve_session(&self, token: &str, now: &str) -> Result<Option<User>> {
        self.session_repo().resolve(token, now).await
    }

    pub async fn revoke_session(&self, token: &str) -> Result<()> {
        self.session_repo().revoke(token).await
    }

    pub async fn purge_expired_sessions(&self, now: &str) -> Result<u64> {
        self.session_repo().purge_expired(now).await
    }

    pub async fn session_count_for_user(&self, user_id: i64) -> Result<u64> {
        self.session_repo().count_for_user(user_id).await
    }

    // ========== Posts ==========

    pub async fn create_post(
        &self,
        user_id: i64,
        title: &str,
        content: &str,
        category_ids: &[i64],
        now: &str,
    ) -> Result<i64> {
        self.post_repo()
            .create(user_id, title, content, category_ids, now)
            .await
    }

    pub async fn update_post(
        &self,
        post_id: i64,
        title: &str,
        content: &str,
        category_ids: &[i64],
    ) -> Result<bool> {
        self.post_repo()
            .update(post_id, title, content, category_ids)
            .await
    }

    pub async fn delete_post_cascade(&self, post_id: i64) -> Result<bool> {
        self.post_repo().delete_cascade(post_id).await
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Option<Post>> {
        self.post_repo().get(post_id).await
    }

    pub async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>> {
        self.post_repo().list(filter).await
    }

    pub async fn post_owner(&self, post_id: i64) -> Result<Option<i64>> {
        self.post_repo().owner_of(post_id).await
    }

    pub async fn post_exists(&self, post_id: i64) -> Result<bool> {
        self.post_repo().exists(post_id).await
    }

    // ========== Comments ==========

    pub async fn create_comment(
        &self,
        post_id: i64,
        user_id: i64,
        content: &str,
        now: &str,
    ) -> Result<i64> {
        self.comment_repo()
            .create(post_id, user_id, content, now)
            .await
    }

    pub async fn comment_owner(&self, comment_id: i64) -> Result<Option<i64>> {
        self.comment_repo().owner_of(comment_id).await
    }

    pub async fn get_comment(
        &self,
        comment_id: i64,
    ) -> Result<Option<crate::entities::comments::Model>> {
        self.comment_repo().get(comment_id).await
    }

    pub async fn update_comment(&self, comment_id: i64, content: &str) -> Result<bool> {
        self.comment_repo().update_content(comment_id, content).await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        self.comment_repo().delete(comment_id).await
    }

    pub async fn list_comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.comment_repo().list_for_post(post_id).await
    }

    // ========== Reactions ==========

    pub async fn set_reaction(
        &self,
        user_id: i64,
        target: ReactionTarget,
        kind: ReactionKind,
    ) -> Result<ReactionCounts> {
        self.reaction_repo().set(user_id, target, kind).await
    }

    pub async fn reaction_state(
        &self,
        user_id: i64,
        target: ReactionTarget,
    ) -> Result<Option<ReactionKind>> {
        self.reaction_repo().state(user_id, target).await
    }

    pub async fn reaction_counts(&self, target: ReactionTarget) -> Result<ReactionCounts> {
        self.reaction_repo().counts(target).await
    }

    // ========== Categories ==========

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.category_repo().list().await
    }

    pub async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.category_repo().get(id).await
    }
}
