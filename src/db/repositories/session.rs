use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::entities::{prelude::*, sessions};
use crate::models::User;

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Atomic session replace: every prior session for the user goes
    /// away in the same transaction that inserts the new one. If the
    /// insert fails the delete rolls back too, leaving the user either
    /// fully logged in on the new token or untouched, never stranded
    /// half-way.
    pub async fn replace_for_user(
        &self,
        user_id: i64,
        token: &str,
        expires_at: &str,
    ) -> Result<()> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open session-replace transaction")?;

        Sessions::delete_many()
            .filter(sessions::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .context("Failed to delete prior sessions")?;

        Sessions::insert(sessions::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(user_id),
            expires_at: Set(expires_at.to_string()),
        })
        .exec(&txn)
        .await
        .context("Failed to insert session")?;

        txn.commit()
            .await
            .context("Failed to commit session replace")?;

        Ok(())
    }

    /// Resolve a token to its user. Expired rows are filtered out here
    /// rather than deleted; lazy expiry, the sweeper reclaims them.
    pub async fn resolve(&self, token: &str, now: &str) -> Result<Option<User>> {
        let found = Sessions::find_by_id(token)
            .filter(sessions::Column::ExpiresAt.gt(now))
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to resolve session")?;

        Ok(found.and_then(|(_, user)| user).map(User::from))
    }

    /// Delete by token. Deleting a token that does not exist is not an
    /// error; logout is idempotent.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        Sessions::delete_by_id(token)
            .exec(&self.conn)
            .await
            .context("Failed to revoke session")?;

        Ok(())
    }

    /// Bulk-delete rows whose expiry has passed. Storage reclamation
    /// only; correctness never depends on this running.
    pub async fn purge_expired(&self, now: &str) -> Result<u64> {
        let result = Sessions::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(now))
            .exec(&self.conn)
            .await
            .context("Failed to purge expired sessions")?;

        Ok(result.rows_affected)
    }

    pub async fn count_for_user(&self, user_id: i64) -> Result<u64> {
        Sessions::find()
            .filter(sessions::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("Failed to count sessions")
    }
}
