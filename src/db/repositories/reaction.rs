use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Select, Set, TransactionTrait,
};

use crate::entities::{prelude::*, reactions};
use crate::models::{ReactionCounts, ReactionKind, ReactionTarget};

pub struct ReactionRepository {
    conn: DatabaseConnection,
}

impl ReactionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Apply one click of the reaction state machine and return the
    /// target's fresh counts. Lookup, mutation and recount run in one
    /// transaction; a failure anywhere leaves the
    /// ledger exactly as it was.
    ///
    /// No existing row: insert. Same kind: delete (toggle off).
    /// Other kind: update in place, so a switch never double-counts.
    pub async fn set(
        &self,
        user_id: i64,
        target: ReactionTarget,
        kind: ReactionKind,
    ) -> Result<ReactionCounts> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open reaction transaction")?;

        let existing = for_target(Reactions::find(), target)
            .filter(reactions::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .context("Failed to look up existing reaction")?;

        match existing {
            None => {
                let (post_id, comment_id) = match target {
                    ReactionTarget::Post(id) => (Some(id), None),
                    ReactionTarget::Comment(id) => (None, Some(id)),
                };

                Reactions::insert(reactions::ActiveModel {
                    user_id: Set(user_id),
                    post_id: Set(post_id),
                    comment_id: Set(comment_id),
                    kind: Set(kind.as_str().to_string()),
                    ..Default::default()
                })
                .exec(&txn)
                .await
                .context("Failed to insert reaction")?;
            }
            Some(row) if row.kind == kind.as_str() => {
                Reactions::delete_by_id(row.id)
                    .exec(&txn)
                    .await
                    .context("Failed to remove toggled reaction")?;
            }
            Some(row) => {
                let mut active: reactions::ActiveModel = row.into();
                active.kind = Set(kind.as_str().to_string());
                active
                    .update(&txn)
                    .await
                    .context("Failed to switch reaction kind")?;
            }
        }

        let counts = counts_on(&txn, target).await?;

        txn.commit()
            .await
            .context("Failed to commit reaction transaction")?;

        Ok(counts)
    }

    /// The caller's current reaction on a target, if any.
    pub async fn state(
        &self,
        user_id: i64,
        target: ReactionTarget,
    ) -> Result<Option<ReactionKind>> {
        let row = for_target(Reactions::find(), target)
            .filter(reactions::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query reaction state")?;

        Ok(row.and_then(|r| r.kind.parse().ok()))
    }

    pub async fn counts(&self, target: ReactionTarget) -> Result<ReactionCounts> {
        counts_on(&self.conn, target).await
    }
}

fn for_target(query: Select<Reactions>, target: ReactionTarget) -> Select<Reactions> {
    match target {
        ReactionTarget::Post(id) => query.filter(reactions::Column::PostId.eq(id)),
        ReactionTarget::Comment(id) => query.filter(reactions::Column::CommentId.eq(id)),
    }
}

pub(crate) async fn counts_on<C: ConnectionTrait>(
    conn: &C,
    target: ReactionTarget,
) -> Result<ReactionCounts> {
    let likes = for_target(Reactions::find(), target)
        .filter(reactions::Column::Kind.eq(ReactionKind::Like.as_str()))
        .count(conn)
        .await
        .context("Failed to count likes")?;

    let dislikes = for_target(Reactions::find(), target)
        .filter(reactions::Column::Kind.eq(ReactionKind::Dislike.as_str()))
        .count(conn)
        .await
        .context("Failed to count dislikes")?;

    Ok(ReactionCounts { likes, dislikes })
}
