use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use thiserror::Error;

use crate::entities::{prelude::*, users};
use crate::models::User;

/// Registration failure. Duplicates are detected from the store's
/// unique constraints rather than a count/exists pre-check, so two
/// concurrent signups can never both succeed.
#[derive(Debug, Error)]
pub enum NewUserError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("username already taken")]
    DuplicateUsername,

    #[error(transparent)]
    Database(#[from] DbErr),
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new user. The first user ever created is an admin; the
    /// count and the insert share one transaction so SQLite serializes
    /// them against a concurrent first registration.
    pub async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
        now: &str,
    ) -> Result<User, NewUserError> {
        let txn = self.conn.begin().await?;

        let existing = Users::find().count(&txn).await?;
        let is_admin = existing == 0;

        let inserted = Users::insert(users::ActiveModel {
            email: Set(email.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_admin: Set(is_admin),
            created_at: Set(now.to_string()),
            ..Default::default()
        })
        .exec(&txn)
        .await
        .map_err(classify_unique_violation)?;

        let user = Users::find_by_id(inserted.last_insert_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("created user vanished".to_string()))?;

        txn.commit().await?;

        Ok(User::from(user))
    }

    /// Get user by email, including the password hash (login path only).
    pub async fn get_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn count(&self) -> Result<u64> {
        Users::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }
}

/// Map a SQLite unique-constraint violation on the users table to the
/// matching registration conflict; pass anything else through.
fn classify_unique_violation(err: DbErr) -> NewUserError {
    let message = err.to_string();
    if message.contains("UNIQUE constraint failed") {
        if message.contains("users.email") {
            return NewUserError::DuplicateEmail;
        }
        if message.contains("users.username") {
            return NewUserError::DuplicateUsername;
        }
    }
    NewUserError::Database(err)
}
