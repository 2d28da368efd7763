use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CommentService, PostService, ReactionService, SeaOrmAuthService,
    SeaOrmCommentService, SeaOrmPostService, SeaOrmReactionService,
};

/// Everything a request handler might need, wired once at startup over
/// a single connection pool. The store is the only shared mutable
/// resource; no in-process caching of sessions or counts.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub post_service: Arc<dyn PostService>,

    pub comment_service: Arc<dyn CommentService>,

    pub reaction_service: Arc<dyn ReactionService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
            config.sessions.clone(),
        )) as Arc<dyn AuthService>;

        let post_service = Arc::new(SeaOrmPostService::new(
            store.clone(),
            config.forum.default_category_id,
        )) as Arc<dyn PostService>;

        let comment_service = Arc::new(SeaOrmCommentService::new(
            store.clone(),
            config.forum.display_utc_offset_hours,
        )) as Arc<dyn CommentService>;

        let reaction_service =
            Arc::new(SeaOrmReactionService::new(store.clone())) as Arc<dyn ReactionService>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            auth_service,
            post_service,
            comment_service,
            reaction_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
