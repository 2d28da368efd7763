//! `SeaORM` implementation of the `ReactionService` trait.

use async_trait::async_trait;
use tracing::debug;

use crate::db::Store;
use crate::models::{ReactionCounts, ReactionKind, ReactionTarget, User};
use crate::services::reaction_service::{ReactionError, ReactionService};

pub struct SeaOrmReactionService {
    store: Store,
}

impl SeaOrmReactionService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn target_exists(&self, target: ReactionTarget) -> Result<bool, ReactionError> {
        match target {
            ReactionTarget::Post(id) => Ok(self.store.post_exists(id).await?),
            ReactionTarget::Comment(id) => Ok(self.store.get_comment(id).await?.is_some()),
        }
    }
}

#[async_trait]
impl ReactionService for SeaOrmReactionService {
    async fn react(
        &self,
        user: &User,
        target: ReactionTarget,
        kind: ReactionKind,
    ) -> Result<ReactionCounts, ReactionError> {
        if !self.target_exists(target).await? {
            return Err(ReactionError::NotFound);
        }

        let counts = self.store.set_reaction(user.id, target, kind).await?;

        debug!(
            user_id = user.id,
            ?target,
            kind = %kind,
            likes = counts.likes,
            dislikes = counts.dislikes,
            "Reaction applied"
        );

        Ok(counts)
    }

    async fn reaction_state(
        &self,
        user: &User,
        target: ReactionTarget,
    ) -> Result<Option<ReactionKind>, ReactionError> {
        Ok(self.store.reaction_state(user.id, target).await?)
    }
}
