//! Identity and session persistence on the `PostgreSQL` backend.
//!
//! Identities are created at registration and never deleted. Sessions are
//! opaque bearer tokens; one row per open login.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use geohunt_types::{Identity, Session, UserId};

use crate::error::StoreError;
use crate::postgres::PgStore;
use crate::repo::{IdentityRepo, NewIdentity, SessionRepo};

/// Row shape of the `identities` table.
#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    username: String,
    password_hash: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Self {
            id: UserId::from(row.id),
            username: row.username,
            password_hash: row.password_hash,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

/// Row shape of the `sessions` table.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    token: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            token: row.token,
            user_id: UserId::from(row.user_id),
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl IdentityRepo for PgStore {
    async fn create_identity(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let id = UserId::new();

        let row = sqlx::query_as::<_, IdentityRow>(
            r"INSERT INTO identities (id, username, password_hash, email)
              VALUES ($1, $2, $3, $4)
              RETURNING id, username, password_hash, email, created_at",
        )
        .bind(id.into_inner())
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| StoreError::from_insert(e, &new.username))?;

        tracing::info!(user_id = %id, username = %new.username, "Created identity");
        Ok(row.into())
    }

    async fn get_identity(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r"SELECT id, username, password_hash, email, created_at
              FROM identities
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn get_identity_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r"SELECT id, username, password_hash, email, created_at
              FROM identities
              WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn update_email(&self, id: UserId, email: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(r"UPDATE identities SET email = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(email)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SessionRepo for PgStore {
    async fn create_session(&self, session: Session) -> Result<(), StoreError> {
        sqlx::query(
            r"INSERT INTO sessions (token, user_id, created_at, expires_at)
              VALUES ($1, $2, $3, $4)",
        )
        .bind(session.token)
        .bind(session.user_id.into_inner())
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(self.pool())
        .await?;

        tracing::debug!(user_id = %session.user_id, "Opened session");
        Ok(())
    }

    async fn get_session(&self, token: Uuid) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r"SELECT token, user_id, created_at, expires_at
              FROM sessions
              WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Session::from))
    }

    async fn delete_session(&self, token: Uuid) -> Result<(), StoreError> {
        sqlx::query(r"DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool())
            .await?;

        Ok(())
    }
}
