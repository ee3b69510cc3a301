//! In-memory backend of the repository traits.
//!
//! Backs unit and router tests, and local development without a
//! database. All tables live behind one [`RwLock`], which makes
//! [`ParticipationRepo::record_score`] trivially atomic: the write guard
//! covers both the append and the points credit.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use geohunt_types::{
    ChestId, Event, EventId, Identity, Participation, ParticipationId, Player, PlayerId, Role,
    Session, TreasureChest, UserId,
};

use crate::error::StoreError;
use crate::repo::{
    ChestRepo, EventRepo, IdentityRepo, NewIdentity, ParticipationRepo, PlayerRepo, SessionRepo,
};

/// All tables of the in-memory store.
#[derive(Debug, Default)]
struct Inner {
    identities: BTreeMap<UserId, Identity>,
    players: BTreeMap<PlayerId, Player>,
    events: BTreeMap<EventId, Event>,
    participations: BTreeMap<ParticipationId, Participation>,
    chests: BTreeMap<ChestId, TreasureChest>,
    sessions: BTreeMap<Uuid, Session>,
}

/// In-memory implementation of the full [`Store`](crate::repo::Store)
/// surface.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepo for MemoryStore {
    async fn create_identity(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let mut inner = self.inner.write().await;

        if inner
            .identities
            .values()
            .any(|i| i.username == new.username)
        {
            return Err(StoreError::DuplicateUsername(new.username));
        }

        let identity = Identity {
            id: UserId::new(),
            username: new.username,
            password_hash: new.password_hash,
            email: new.email,
            created_at: Utc::now(),
        };
        inner.identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn get_identity(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        Ok(self.inner.read().await.identities.get(&id).cloned())
    }

    async fn get_identity_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .identities
            .values()
            .find(|i| i.username == username)
            .cloned())
    }

    async fn update_email(&self, id: UserId, email: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.identities.get_mut(&id) {
            Some(identity) => {
                identity.email = email.to_owned();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PlayerRepo for MemoryStore {
    async fn create_player(&self, player: Player) -> Result<(), StoreError> {
        self.inner.write().await.players.insert(player.id, player);
        Ok(())
    }

    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(self.inner.read().await.players.get(&id).cloned())
    }

    async fn get_player_by_user(&self, user_id: UserId) -> Result<Option<Player>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .players
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn top_players(&self, limit: i64) -> Result<Vec<Player>, StoreError> {
        let inner = self.inner.read().await;
        let mut players: Vec<Player> = inner.players.values().cloned().collect();
        players.sort_by(|a, b| b.points.cmp(&a.points));
        players.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(players)
    }

    async fn set_role(&self, id: PlayerId, role: Role) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.players.get_mut(&id) {
            Some(player) => {
                player.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl EventRepo for MemoryStore {
    async fn create_event(&self, event: Event) -> Result<(), StoreError> {
        self.inner.write().await.events.insert(event.id, event);
        Ok(())
    }

    async fn get_event(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.inner.read().await.events.get(&id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner.events.values().cloned().collect();
        events.sort_by_key(|e| e.end);
        Ok(events)
    }

    async fn list_live_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.status_at(now).is_live())
            .cloned()
            .collect();
        events.sort_by_key(|e| e.end);
        Ok(events)
    }

    async fn update_event(&self, event: &Event) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.events.get_mut(&event.id) {
            Some(existing) => {
                *existing = event.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_event(&self, id: EventId) -> Result<(), StoreError> {
        self.inner.write().await.events.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ParticipationRepo for MemoryStore {
    async fn record_score(
        &self,
        player_id: PlayerId,
        event_id: EventId,
        score: i64,
    ) -> Result<Participation, StoreError> {
        let mut inner = self.inner.write().await;

        let player = inner
            .players
            .get_mut(&player_id)
            .ok_or_else(|| StoreError::Decode(format!("no such player: {player_id}")))?;
        player.points = player.points.saturating_add(score);

        let participation = Participation {
            id: ParticipationId::new(),
            player_id,
            event_id,
            score,
            created_at: Utc::now(),
        };
        inner
            .participations
            .insert(participation.id, participation.clone());
        Ok(participation)
    }

    async fn list_participations(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<Participation>, StoreError> {
        let inner = self.inner.read().await;
        let mut participations: Vec<Participation> = inner
            .participations
            .values()
            .filter(|p| p.player_id == player_id)
            .cloned()
            .collect();
        participations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(participations)
    }
}

#[async_trait]
impl ChestRepo for MemoryStore {
    async fn create_chest(&self, chest: TreasureChest) -> Result<(), StoreError> {
        self.inner.write().await.chests.insert(chest.id, chest);
        Ok(())
    }

    async fn get_chest(&self, id: ChestId) -> Result<Option<TreasureChest>, StoreError> {
        Ok(self.inner.read().await.chests.get(&id).cloned())
    }

    async fn list_chests(&self) -> Result<Vec<TreasureChest>, StoreError> {
        // BTreeMap iteration over v7 keys is creation order.
        Ok(self.inner.read().await.chests.values().cloned().collect())
    }

    async fn update_chest(&self, chest: &TreasureChest) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.chests.get_mut(&chest.id) {
            Some(existing) => {
                *existing = chest.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_chest(&self, id: ChestId) -> Result<(), StoreError> {
        self.inner.write().await.chests.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SessionRepo for MemoryStore {
    async fn create_session(&self, session: Session) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .sessions
            .insert(session.token, session);
        Ok(())
    }

    async fn get_session(&self, token: Uuid) -> Result<Option<Session>, StoreError> {
        Ok(self.inner.read().await.sessions.get(&token).cloned())
    }

    async fn delete_session(&self, token: Uuid) -> Result<(), StoreError> {
        self.inner.write().await.sessions.remove(&token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

    use chrono::TimeDelta;
    use rust_decimal::Decimal;

    use super::*;

    fn sample_event(start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event {
            id: EventId::new(),
            title: String::from("Park Hunt"),
            description: String::from("Find the marker."),
            start,
            end,
            latitude: Decimal::new(10, 1),
            longitude: Decimal::new(20, 1),
        }
    }

    async fn sample_player(store: &MemoryStore) -> Player {
        let identity = store
            .create_identity(NewIdentity {
                username: format!("user-{}", Uuid::now_v7()),
                password_hash: String::from("$argon2id$stub"),
                email: String::from("user@example.com"),
            })
            .await
            .unwrap();
        let player = Player::new(PlayerId::new(), identity.id);
        store.create_player(player.clone()).await.unwrap();
        player
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        let new = NewIdentity {
            username: String::from("alice"),
            password_hash: String::from("$argon2id$stub"),
            email: String::from("alice@example.com"),
        };
        store.create_identity(new.clone()).await.unwrap();

        let err = store.create_identity(new).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername(name) if name == "alice"));
    }

    #[tokio::test]
    async fn record_score_credits_player_and_appends() {
        let store = MemoryStore::new();
        let player = sample_player(&store).await;
        let now = Utc::now();
        let event = sample_event(now, now + TimeDelta::hours(1));
        store.create_event(event.clone()).await.unwrap();

        let participation = store.record_score(player.id, event.id, 50).await.unwrap();
        assert_eq!(participation.score, 50);

        let stored = store.get_player(player.id).await.unwrap().unwrap();
        assert_eq!(stored.points, 50);
        assert_eq!(store.list_participations(player.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn top_players_orders_descending_and_truncates() {
        let store = MemoryStore::new();
        for points in [30, 10, 20] {
            let player = sample_player(&store).await;
            let event = sample_event(Utc::now(), Utc::now() + TimeDelta::hours(1));
            store.create_event(event.clone()).await.unwrap();
            store.record_score(player.id, event.id, points).await.unwrap();
        }

        let top = store.top_players(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top.first().unwrap().points, 30);
        assert_eq!(top.get(1).unwrap().points, 20);
    }

    #[tokio::test]
    async fn live_event_listing_filters_by_window() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let live = sample_event(now - TimeDelta::minutes(5), now + TimeDelta::minutes(5));
        let past = sample_event(now - TimeDelta::hours(2), now - TimeDelta::hours(1));
        let future = sample_event(now + TimeDelta::hours(1), now + TimeDelta::hours(2));
        for event in [live.clone(), past, future] {
            store.create_event(event).await.unwrap();
        }

        let listed = store.list_live_events(now).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().unwrap().id, live.id);
    }

    #[tokio::test]
    async fn update_and_delete_report_absence() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let event = sample_event(now, now + TimeDelta::hours(1));

        assert!(!store.update_event(&event).await.unwrap());
        store.delete_event(event.id).await.unwrap();

        store.create_event(event.clone()).await.unwrap();
        let mut renamed = event.clone();
        renamed.title = String::from("Renamed");
        assert!(store.update_event(&renamed).await.unwrap());
        assert_eq!(
            store.get_event(event.id).await.unwrap().unwrap().title,
            "Renamed"
        );
    }

    #[tokio::test]
    async fn sessions_round_trip_and_delete_idempotently() {
        let store = MemoryStore::new();
        let identity = store
            .create_identity(NewIdentity {
                username: String::from("bob"),
                password_hash: String::from("$argon2id$stub"),
                email: String::from("bob@example.com"),
            })
            .await
            .unwrap();

        let now = Utc::now();
        let session = Session {
            token: Uuid::now_v7(),
            user_id: identity.id,
            created_at: now,
            expires_at: now + TimeDelta::hours(12),
        };
        store.create_session(session.clone()).await.unwrap();

        let found = store.get_session(session.token).await.unwrap().unwrap();
        assert_eq!(found.user_id, identity.id);

        store.delete_session(session.token).await.unwrap();
        store.delete_session(session.token).await.unwrap();
        assert!(store.get_session(session.token).await.unwrap().is_none());
    }
}
