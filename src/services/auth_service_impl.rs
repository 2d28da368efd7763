//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::info;

use crate::config::{SecurityConfig, SessionConfig};
use crate::constants::validation::MIN_PASSWORD_LENGTH;
use crate::db::{NewUserError, Store};
use crate::models::User;
use crate::services::auth_service::{AuthError, AuthService, RegisterResult, SessionHandle};
use crate::services::credentials;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    sessions: SessionConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig, sessions: SessionConfig) -> Self {
        Self {
            store,
            security,
            sessions,
        }
    }

    /// Issue a fresh token for the user, replacing any prior session
    /// in one transaction.
    async fn issue_session(&self, user_id: i64, remember: bool) -> Result<SessionHandle, AuthError> {
        let token = credentials::generate_session_token();

        let lifetime = if remember {
            Duration::days(self.sessions.remember_days)
        } else {
            Duration::hours(self.sessions.session_hours)
        };
        let expires_at = Utc::now() + lifetime;

        self.store
            .replace_sessions_for_user(user_id, &token, &expires_at.to_rfc3339())
            .await?;

        Ok(SessionHandle { token, expires_at })
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<RegisterResult, AuthError> {
        let email = email.trim();
        let username = username.trim();

        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Validation("A valid email is required".to_string()));
        }
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let password_hash = credentials::hash_password(password, &self.security).await?;
        let now = Utc::now().to_rfc3339();

        let user = self
            .store
            .create_user(email, username, &password_hash, &now)
            .await
            .map_err(|e| match e {
                NewUserError::DuplicateEmail => AuthError::DuplicateEmail,
                NewUserError::DuplicateUsername => AuthError::DuplicateUsername,
                NewUserError::Database(err) => AuthError::from(err),
            })?;

        if user.is_admin {
            info!(user_id = user.id, "First registered user granted admin");
        }

        let session = if remember {
            Some(self.issue_session(user.id, true).await?)
        } else {
            None
        };

        Ok(RegisterResult { user, session })
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<(User, SessionHandle), AuthError> {
        let Some((user, password_hash)) = self
            .store
            .get_user_by_email_with_password(email.trim())
            .await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        let is_valid = credentials::verify_password(&password_hash, password).await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.issue_session(user.id, remember).await?;

        info!(
            user_id = user.id,
            remember, "Session issued, prior sessions invalidated"
        );

        Ok((user, session))
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.store.revoke_session(token).await?;
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<Option<User>, AuthError> {
        let now = Utc::now().to_rfc3339();
        let user = self.store.resolve_session(token, &now).await?;
        Ok(user)
    }
}
