//! Domain service for the reaction ledger.

use thiserror::Error;

use crate::models::{ReactionCounts, ReactionKind, ReactionTarget, User};

#[derive(Debug, Error)]
pub enum ReactionError {
    #[error("Target not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ReactionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait ReactionService: Send + Sync {
    /// One click of the per-(user, target) state machine:
    /// no reaction → insert; same kind again → remove (toggle off);
    /// other kind → switch in place. Returns the target's fresh
    /// counts. The whole step is atomic; a failure changes nothing.
    async fn react(
        &self,
        user: &User,
        target: ReactionTarget,
        kind: ReactionKind,
    ) -> Result<ReactionCounts, ReactionError>;

    /// The user's current reaction on a target, for pre-populating
    /// "already liked" state in views.
    async fn reaction_state(
        &self,
        user: &User,
        target: ReactionTarget,
    ) -> Result<Option<ReactionKind>, ReactionError>;
}
