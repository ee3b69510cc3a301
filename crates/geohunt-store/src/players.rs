//! Player persistence on the `PostgreSQL` backend.
//!
//! Holds the accumulated points total and the role. The points column is
//! only ever written through [`crate::participations`], which credits it
//! server-side inside the scoring transaction.

use async_trait::async_trait;
use uuid::Uuid;

use geohunt_types::{Player, PlayerId, Role, UserId};

use crate::error::StoreError;
use crate::postgres::PgStore;
use crate::repo::PlayerRepo;

/// Row shape of the `players` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PlayerRow {
    pub(crate) id: Uuid,
    pub(crate) user_id: Uuid,
    pub(crate) points: i64,
    pub(crate) role: String,
}

impl PlayerRow {
    /// Decode the row, rejecting unknown role strings.
    pub(crate) fn into_player(self) -> Result<Player, StoreError> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| StoreError::Decode(format!("unknown player role: {}", self.role)))?;

        Ok(Player {
            id: PlayerId::from(self.id),
            user_id: UserId::from(self.user_id),
            points: self.points,
            role,
        })
    }
}

#[async_trait]
impl PlayerRepo for PgStore {
    async fn create_player(&self, player: Player) -> Result<(), StoreError> {
        sqlx::query(
            r"INSERT INTO players (id, user_id, points, role)
              VALUES ($1, $2, $3, $4)",
        )
        .bind(player.id.into_inner())
        .bind(player.user_id.into_inner())
        .bind(player.points)
        .bind(player.role.as_str())
        .execute(self.pool())
        .await?;

        tracing::info!(player_id = %player.id, user_id = %player.user_id, "Created player");
        Ok(())
    }

    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r"SELECT id, user_id, points, role FROM players WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool())
        .await?;

        row.map(PlayerRow::into_player).transpose()
    }

    async fn get_player_by_user(&self, user_id: UserId) -> Result<Option<Player>, StoreError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r"SELECT id, user_id, points, role FROM players WHERE user_id = $1",
        )
        .bind(user_id.into_inner())
        .fetch_optional(self.pool())
        .await?;

        row.map(PlayerRow::into_player).transpose()
    }

    async fn top_players(&self, limit: i64) -> Result<Vec<Player>, StoreError> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            r"SELECT id, user_id, points, role
              FROM players
              ORDER BY points DESC
              LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(PlayerRow::into_player).collect()
    }

    async fn set_role(&self, id: PlayerId, role: Role) -> Result<bool, StoreError> {
        let result = sqlx::query(r"UPDATE players SET role = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(role.as_str())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
