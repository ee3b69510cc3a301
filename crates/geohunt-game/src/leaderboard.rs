//! The leaderboard query: top players by accumulated points.
//!
//! Read-only. Ties break arbitrarily (whatever order the backend
//! produces); the contract is only that scores are non-increasing and at
//! most [`LEADERBOARD_SIZE`] rows come back.

use serde::Serialize;

use geohunt_store::Store;

use crate::error::GameError;

/// Maximum number of players on the leaderboard.
pub const LEADERBOARD_SIZE: i64 = 10;

/// One leaderboard row, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    /// The player's login handle.
    pub username: String,
    /// Accumulated points.
    pub points: i64,
}

/// The top players by points, descending, at most [`LEADERBOARD_SIZE`].
///
/// Players whose identity record has vanished are skipped rather than
/// failing the whole board.
pub async fn top_players(store: &dyn Store) -> Result<Vec<LeaderboardEntry>, GameError> {
    let players = store.top_players(LEADERBOARD_SIZE).await?;

    let mut entries = Vec::with_capacity(players.len());
    for player in players {
        if let Some(identity) = store.get_identity(player.user_id).await? {
            entries.push(LeaderboardEntry {
                rank: entries.len().saturating_add(1),
                username: identity.username,
                points: player.points,
            });
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

    use chrono::{TimeDelta, Utc};
    use geohunt_store::{EventRepo, MemoryStore, ParticipationRepo};
    use geohunt_types::{Event, EventId};
    use rust_decimal::Decimal;

    use crate::auth::{register, RegisterInput};

    use super::*;

    async fn seed_players(store: &MemoryStore, scores: &[i64]) {
        let event = Event {
            id: EventId::new(),
            title: String::from("Seed Hunt"),
            description: String::from("Seeding scores."),
            start: Utc::now(),
            end: Utc::now() + TimeDelta::hours(1),
            latitude: Decimal::ZERO,
            longitude: Decimal::ZERO,
        };
        store.create_event(event.clone()).await.unwrap();

        for (index, score) in scores.iter().enumerate() {
            let (caller, _) = register(
                store,
                RegisterInput {
                    username: format!("player{index}"),
                    email: format!("player{index}@example.com"),
                    password: String::from("hunter2hunter2"),
                },
                TimeDelta::hours(12),
            )
            .await
            .unwrap();
            store
                .record_score(caller.player.id, event.id, *score)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn board_is_descending_and_capped_at_ten() {
        let store = MemoryStore::new();
        seed_players(&store, &[5, 30, 12, 7, 19, 3, 25, 8, 14, 21, 2, 17]).await;

        let board = top_players(&store).await.unwrap();
        assert_eq!(board.len(), 10);
        for pair in board.windows(2) {
            if let [a, b] = pair {
                assert!(a.points >= b.points);
            }
        }
        assert_eq!(board.first().unwrap().points, 30);
        assert_eq!(board.first().unwrap().rank, 1);
        assert_eq!(board.last().unwrap().rank, 10);
    }

    #[tokio::test]
    async fn small_populations_fit_entirely() {
        let store = MemoryStore::new();
        seed_players(&store, &[4, 9]).await;

        let board = top_players(&store).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board.first().unwrap().points, 9);
        assert_eq!(board.first().unwrap().username, "player1");
    }

    #[tokio::test]
    async fn empty_population_yields_empty_board() {
        let store = MemoryStore::new();
        assert!(top_players(&store).await.unwrap().is_empty());
    }
}
