//! Repository traits: the persistence seam of the game.
//!
//! Each entity gets one small trait with `get`/`list`/`save`/`delete`
//! shaped operations; [`Store`] bundles them so the domain layer can hold
//! a single `Arc<dyn Store>` and swap backends (`PostgreSQL` in
//! production, in-memory in tests) without touching call sites.
//!
//! Traits are object-safe via [`async_trait`] and all lookups return
//! `Option` rather than a not-found error; the domain layer promotes
//! absence to its own error taxonomy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use geohunt_types::{
    ChestId, Event, EventId, Identity, Participation, Player, PlayerId, Role, Session,
    TreasureChest, UserId,
};

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Input parameters
// ---------------------------------------------------------------------------

/// Fields required to create a new [`Identity`].
///
/// The password arrives already hashed; repositories never see plaintext
/// credentials.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    /// Login handle, unique across all identities.
    pub username: String,
    /// PHC-format Argon2 password hash.
    pub password_hash: String,
    /// Contact address.
    pub email: String,
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Persistence operations for user accounts.
#[async_trait]
pub trait IdentityRepo: Send + Sync {
    /// Create an identity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateUsername`] if the handle is taken.
    async fn create_identity(&self, new: NewIdentity) -> Result<Identity, StoreError>;

    /// Look up an identity by ID.
    async fn get_identity(&self, id: UserId) -> Result<Option<Identity>, StoreError>;

    /// Look up an identity by its login handle.
    async fn get_identity_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, StoreError>;

    /// Replace the contact address of an identity.
    ///
    /// Returns `false` if the identity does not exist.
    async fn update_email(&self, id: UserId, email: &str) -> Result<bool, StoreError>;
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Persistence operations for player records.
#[async_trait]
pub trait PlayerRepo: Send + Sync {
    /// Create a player record.
    async fn create_player(&self, player: Player) -> Result<(), StoreError>;

    /// Look up a player by ID.
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;

    /// Look up the player owned by an identity.
    async fn get_player_by_user(&self, user_id: UserId) -> Result<Option<Player>, StoreError>;

    /// The top players by accumulated points, descending, at most `limit`
    /// rows. Tie order is whatever the backend produces.
    async fn top_players(&self, limit: i64) -> Result<Vec<Player>, StoreError>;

    /// Replace a player's role.
    ///
    /// Returns `false` if the player does not exist. Used by the startup
    /// bootstrap that grants game-master rights to configured handles.
    async fn set_role(&self, id: PlayerId, role: Role) -> Result<bool, StoreError>;
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Persistence operations for events.
#[async_trait]
pub trait EventRepo: Send + Sync {
    /// Create an event.
    async fn create_event(&self, event: Event) -> Result<(), StoreError>;

    /// Look up an event by ID.
    async fn get_event(&self, id: EventId) -> Result<Option<Event>, StoreError>;

    /// All events, ordered by their end instant (soonest-ending first).
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;

    /// Events whose window contains `now` (closed interval on both ends).
    async fn list_live_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, StoreError>;

    /// Replace all fields of an event.
    ///
    /// Returns `false` if the event does not exist.
    async fn update_event(&self, event: &Event) -> Result<bool, StoreError>;

    /// Delete an event. Deleting an absent event is not an error.
    async fn delete_event(&self, id: EventId) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Participation
// ---------------------------------------------------------------------------

/// Persistence operations for score submissions.
#[async_trait]
pub trait ParticipationRepo: Send + Sync {
    /// Append a participation record and credit the player's running
    /// total in one atomic step.
    ///
    /// Both writes happen in a single transaction and the points credit
    /// is applied server-side (`points = points + score`), so concurrent
    /// submissions for the same player never lose an update and a crash
    /// can never leave the participation without its credit.
    async fn record_score(
        &self,
        player_id: PlayerId,
        event_id: EventId,
        score: i64,
    ) -> Result<Participation, StoreError>;

    /// All participations by a player, most recent first.
    async fn list_participations(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<Participation>, StoreError>;
}

// ---------------------------------------------------------------------------
// TreasureChest
// ---------------------------------------------------------------------------

/// Persistence operations for treasure chests.
#[async_trait]
pub trait ChestRepo: Send + Sync {
    /// Create a treasure chest.
    async fn create_chest(&self, chest: TreasureChest) -> Result<(), StoreError>;

    /// Look up a chest by ID.
    async fn get_chest(&self, id: ChestId) -> Result<Option<TreasureChest>, StoreError>;

    /// All chests, in insertion order.
    async fn list_chests(&self) -> Result<Vec<TreasureChest>, StoreError>;

    /// Replace all fields of a chest.
    ///
    /// Returns `false` if the chest does not exist.
    async fn update_chest(&self, chest: &TreasureChest) -> Result<bool, StoreError>;

    /// Delete a chest. Deleting an absent chest is not an error.
    async fn delete_chest(&self, id: ChestId) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Persistence operations for login sessions.
#[async_trait]
pub trait SessionRepo: Send + Sync {
    /// Persist a freshly issued session.
    async fn create_session(&self, session: Session) -> Result<(), StoreError>;

    /// Look up a session by its bearer token.
    ///
    /// Expiry is not checked here; callers decide what "valid" means.
    async fn get_session(&self, token: Uuid) -> Result<Option<Session>, StoreError>;

    /// Delete a session. Deleting an absent session is not an error
    /// (logout is idempotent).
    async fn delete_session(&self, token: Uuid) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Store bundle
// ---------------------------------------------------------------------------

/// The full persistence surface the domain layer depends on.
///
/// Blanket-implemented for anything that implements every repository
/// trait, so backends only implement the pieces.
pub trait Store:
    IdentityRepo + PlayerRepo + EventRepo + ParticipationRepo + ChestRepo + SessionRepo
{
}

impl<T> Store for T where
    T: IdentityRepo + PlayerRepo + EventRepo + ParticipationRepo + ChestRepo + SessionRepo
{
}
