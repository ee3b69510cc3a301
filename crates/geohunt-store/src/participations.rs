//! Atomic score recording on the `PostgreSQL` backend.
//!
//! The scoring flow has two durable effects: an appended participation
//! row and an incremented player total. Both happen in one transaction,
//! and the increment runs server-side so concurrent submissions for the
//! same player serialize on the row instead of losing updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use geohunt_types::{EventId, Participation, ParticipationId, PlayerId};

use crate::error::StoreError;
use crate::postgres::PgStore;
use crate::repo::ParticipationRepo;

/// Row shape of the `participations` table.
#[derive(Debug, sqlx::FromRow)]
struct ParticipationRow {
    id: Uuid,
    player_id: Uuid,
    event_id: Uuid,
    score: i64,
    created_at: DateTime<Utc>,
}

impl From<ParticipationRow> for Participation {
    fn from(row: ParticipationRow) -> Self {
        Self {
            id: ParticipationId::from(row.id),
            player_id: PlayerId::from(row.player_id),
            event_id: EventId::from(row.event_id),
            score: row.score,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ParticipationRepo for PgStore {
    async fn record_score(
        &self,
        player_id: PlayerId,
        event_id: EventId,
        score: i64,
    ) -> Result<Participation, StoreError> {
        let id = ParticipationId::new();
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query_as::<_, ParticipationRow>(
            r"INSERT INTO participations (id, player_id, event_id, score)
              VALUES ($1, $2, $3, $4)
              RETURNING id, player_id, event_id, score, created_at",
        )
        .bind(id.into_inner())
        .bind(player_id.into_inner())
        .bind(event_id.into_inner())
        .bind(score)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(r"UPDATE players SET points = points + $2 WHERE id = $1")
            .bind(player_id.into_inner())
            .bind(score)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%player_id, %event_id, score, "Recorded score");
        Ok(row.into())
    }

    async fn list_participations(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<Participation>, StoreError> {
        let rows = sqlx::query_as::<_, ParticipationRow>(
            r"SELECT id, player_id, event_id, score, created_at
              FROM participations
              WHERE player_id = $1
              ORDER BY created_at DESC",
        )
        .bind(player_id.into_inner())
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Participation::from).collect())
    }
}
