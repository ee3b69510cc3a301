//! Treasure chest operations. Every one of them -- reads included -- is
//! game-master-only; chests are placement tooling, not player-facing
//! content.

use serde::Deserialize;
use validator::Validate;

use geohunt_store::Store;
use geohunt_types::{ChestId, TreasureChest};

use crate::coords::{validate_latitude, validate_longitude};
use crate::error::GameError;
use crate::policy::{require_game_master, Caller};

/// Form input for creating or updating a treasure chest.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChestInput {
    /// Display name.
    #[validate(length(min = 1, max = 80, message = "must be 1 to 80 characters"))]
    pub name: String,
    /// Point value awarded for collecting the chest.
    pub points: i64,
    /// Latitude of the chest location.
    #[validate(custom(function = validate_latitude))]
    pub latitude: rust_decimal::Decimal,
    /// Longitude of the chest location.
    #[validate(custom(function = validate_longitude))]
    pub longitude: rust_decimal::Decimal,
}

impl ChestInput {
    /// Materialize the input into a [`TreasureChest`] with the given id.
    fn into_chest(self, id: ChestId) -> TreasureChest {
        TreasureChest {
            id,
            name: self.name,
            points: self.points,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// All chests, in creation order.
pub async fn list(
    store: &dyn Store,
    caller: Option<&Caller>,
) -> Result<Vec<TreasureChest>, GameError> {
    require_game_master(caller)?;
    Ok(store.list_chests().await?)
}

/// A single chest by id.
pub async fn get(
    store: &dyn Store,
    caller: Option<&Caller>,
    id: ChestId,
) -> Result<TreasureChest, GameError> {
    require_game_master(caller)?;
    store
        .get_chest(id)
        .await?
        .ok_or(GameError::NotFound("treasure chest"))
}

/// Create a chest.
pub async fn create(
    store: &dyn Store,
    caller: Option<&Caller>,
    input: ChestInput,
) -> Result<TreasureChest, GameError> {
    let caller = require_game_master(caller)?;
    input.validate()?;

    let chest = input.into_chest(ChestId::new());
    store.create_chest(chest.clone()).await?;

    tracing::info!(
        username = %caller.identity.username,
        chest_id = %chest.id,
        "Game master created treasure chest"
    );
    Ok(chest)
}

/// Replace all fields of a chest.
pub async fn update(
    store: &dyn Store,
    caller: Option<&Caller>,
    id: ChestId,
    input: ChestInput,
) -> Result<TreasureChest, GameError> {
    let caller = require_game_master(caller)?;
    input.validate()?;

    let chest = input.into_chest(id);
    if !store.update_chest(&chest).await? {
        return Err(GameError::NotFound("treasure chest"));
    }

    tracing::info!(
        username = %caller.identity.username,
        chest_id = %chest.id,
        "Game master updated treasure chest"
    );
    Ok(chest)
}

/// Delete a chest; deleting an absent chest is a no-op.
pub async fn delete(
    store: &dyn Store,
    caller: Option<&Caller>,
    id: ChestId,
) -> Result<(), GameError> {
    let caller = require_game_master(caller)?;
    store.delete_chest(id).await?;

    tracing::info!(
        username = %caller.identity.username,
        chest_id = %id,
        "Game master deleted treasure chest"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

    use chrono::TimeDelta;
    use geohunt_store::{MemoryStore, PlayerRepo};
    use geohunt_types::Role;
    use rust_decimal::Decimal;

    use crate::auth::{register, RegisterInput};

    use super::*;

    async fn player(store: &MemoryStore, username: &str, role: Role) -> Caller {
        let (mut caller, _) = register(
            store,
            RegisterInput {
                username: username.to_owned(),
                email: format!("{username}@example.com"),
                password: String::from("hunter2hunter2"),
            },
            TimeDelta::hours(12),
        )
        .await
        .unwrap();
        if role.is_game_master() {
            store
                .set_role(caller.player.id, Role::GameMaster)
                .await
                .unwrap();
            caller.player.role = Role::GameMaster;
        }
        caller
    }

    fn golden_cache() -> ChestInput {
        ChestInput {
            name: String::from("Golden Cache"),
            points: 25,
            latitude: Decimal::new(10, 1),
            longitude: Decimal::new(20, 1),
        }
    }

    #[tokio::test]
    async fn every_operation_is_gated_even_reads() {
        let store = MemoryStore::new();
        let member = player(&store, "alice", Role::Member).await;

        assert!(matches!(
            list(&store, Some(&member)).await.unwrap_err(),
            GameError::AccessDenied
        ));
        assert!(matches!(
            get(&store, Some(&member), ChestId::new()).await.unwrap_err(),
            GameError::AccessDenied
        ));
        assert!(matches!(
            create(&store, Some(&member), golden_cache())
                .await
                .unwrap_err(),
            GameError::AccessDenied
        ));
        assert!(matches!(
            delete(&store, Some(&member), ChestId::new())
                .await
                .unwrap_err(),
            GameError::AccessDenied
        ));
        assert!(matches!(
            list(&store, None).await.unwrap_err(),
            GameError::Unauthenticated
        ));
    }

    #[tokio::test]
    async fn game_master_crud_round_trip() {
        let store = MemoryStore::new();
        let gm = player(&store, "gamemaster", Role::GameMaster).await;

        let chest = create(&store, Some(&gm), golden_cache()).await.unwrap();
        assert_eq!(list(&store, Some(&gm)).await.unwrap().len(), 1);

        let mut input = golden_cache();
        input.points = 40;
        let updated = update(&store, Some(&gm), chest.id, input).await.unwrap();
        assert_eq!(updated.points, 40);

        delete(&store, Some(&gm), chest.id).await.unwrap();
        assert!(matches!(
            get(&store, Some(&gm), chest.id).await.unwrap_err(),
            GameError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn invalid_coordinates_are_field_errors() {
        let store = MemoryStore::new();
        let gm = player(&store, "gamemaster", Role::GameMaster).await;

        let mut input = golden_cache();
        input.longitude = Decimal::from(181);
        let err = create(&store, Some(&gm), input).await.unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
        assert!(list(&store, Some(&gm)).await.unwrap().is_empty());
    }
}
