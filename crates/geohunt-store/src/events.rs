//! Event persistence on the `PostgreSQL` backend.
//!
//! The live-events query pushes the closed-interval window check into
//! SQL (`start_at <= now AND end_at >= now`) so it matches
//! [`geohunt_types::EventStatus::resolve`] exactly, boundaries included.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use geohunt_types::{Event, EventId};

use crate::error::StoreError;
use crate::postgres::PgStore;
use crate::repo::EventRepo;

/// Row shape of the `events` table.
#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    latitude: Decimal,
    longitude: Decimal,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from(row.id),
            title: row.title,
            description: row.description,
            start: row.start_at,
            end: row.end_at,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[async_trait]
impl EventRepo for PgStore {
    async fn create_event(&self, event: Event) -> Result<(), StoreError> {
        sqlx::query(
            r"INSERT INTO events (id, title, description, start_at, end_at, latitude, longitude)
              VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(event.id.into_inner())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(event.latitude)
        .bind(event.longitude)
        .execute(self.pool())
        .await?;

        tracing::info!(event_id = %event.id, title = %event.title, "Created event");
        Ok(())
    }

    async fn get_event(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(
            r"SELECT id, title, description, start_at, end_at, latitude, longitude
              FROM events
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Event::from))
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"SELECT id, title, description, start_at, end_at, latitude, longitude
              FROM events
              ORDER BY end_at",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_live_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"SELECT id, title, description, start_at, end_at, latitude, longitude
              FROM events
              WHERE start_at <= $1 AND end_at >= $1
              ORDER BY end_at",
        )
        .bind(now)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn update_event(&self, event: &Event) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"UPDATE events
              SET title = $2, description = $3, start_at = $4, end_at = $5,
                  latitude = $6, longitude = $7
              WHERE id = $1",
        )
        .bind(event.id.into_inner())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(event.latitude)
        .bind(event.longitude)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_event(&self, id: EventId) -> Result<(), StoreError> {
        sqlx::query(r"DELETE FROM events WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool())
            .await?;

        tracing::info!(event_id = %id, "Deleted event");
        Ok(())
    }
}
