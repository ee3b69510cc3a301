//! Treasure chest persistence on the `PostgreSQL` backend.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use geohunt_types::{ChestId, TreasureChest};

use crate::error::StoreError;
use crate::postgres::PgStore;
use crate::repo::ChestRepo;

/// Row shape of the `treasure_chests` table.
#[derive(Debug, sqlx::FromRow)]
struct ChestRow {
    id: Uuid,
    name: String,
    points: i64,
    latitude: Decimal,
    longitude: Decimal,
}

impl From<ChestRow> for TreasureChest {
    fn from(row: ChestRow) -> Self {
        Self {
            id: ChestId::from(row.id),
            name: row.name,
            points: row.points,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[async_trait]
impl ChestRepo for PgStore {
    async fn create_chest(&self, chest: TreasureChest) -> Result<(), StoreError> {
        sqlx::query(
            r"INSERT INTO treasure_chests (id, name, points, latitude, longitude)
              VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(chest.id.into_inner())
        .bind(&chest.name)
        .bind(chest.points)
        .bind(chest.latitude)
        .bind(chest.longitude)
        .execute(self.pool())
        .await?;

        tracing::info!(chest_id = %chest.id, name = %chest.name, "Created treasure chest");
        Ok(())
    }

    async fn get_chest(&self, id: ChestId) -> Result<Option<TreasureChest>, StoreError> {
        let row = sqlx::query_as::<_, ChestRow>(
            r"SELECT id, name, points, latitude, longitude
              FROM treasure_chests
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(TreasureChest::from))
    }

    async fn list_chests(&self) -> Result<Vec<TreasureChest>, StoreError> {
        // UUID v7 primary keys sort in creation order.
        let rows = sqlx::query_as::<_, ChestRow>(
            r"SELECT id, name, points, latitude, longitude
              FROM treasure_chests
              ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(TreasureChest::from).collect())
    }

    async fn update_chest(&self, chest: &TreasureChest) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"UPDATE treasure_chests
              SET name = $2, points = $3, latitude = $4, longitude = $5
              WHERE id = $1",
        )
        .bind(chest.id.into_inner())
        .bind(&chest.name)
        .bind(chest.points)
        .bind(chest.latitude)
        .bind(chest.longitude)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_chest(&self, id: ChestId) -> Result<(), StoreError> {
        sqlx::query(r"DELETE FROM treasure_chests WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool())
            .await?;

        tracing::info!(chest_id = %id, "Deleted treasure chest");
        Ok(())
    }
}
