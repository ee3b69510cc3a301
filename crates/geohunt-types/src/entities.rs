//! Core entity structs for the Geohunt game.
//!
//! These are the durable records of the data model: identities, players,
//! events, participations, treasure chests, and sessions. Coordinates use
//! [`Decimal`] (16 fractional digits, matching the highest precision the
//! map provider reports) -- never floating point.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{EventStatus, Role};
use crate::ids::{ChestId, EventId, ParticipationId, PlayerId, UserId};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A user account: the authentication identity a player wraps.
///
/// The password is stored only as a PHC-format Argon2 hash. Identities are
/// created at registration and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique account identifier.
    pub id: UserId,
    /// Login handle, unique across all identities.
    pub username: String,
    /// PHC-format Argon2 password hash. Never serialized to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Contact address, mutable by the account owner.
    pub email: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Game-specific state wrapped around exactly one [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique player identifier.
    pub id: PlayerId,
    /// The identity this player belongs to (1:1).
    pub user_id: UserId,
    /// Accumulated score across all participations. Only mutated through
    /// the scoring flow.
    pub points: i64,
    /// Privilege level. New players start as [`Role::Member`].
    pub role: Role,
}

impl Player {
    /// Create a fresh player for an identity: zero points, member role.
    pub const fn new(id: PlayerId, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            points: 0,
            role: Role::Member,
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A named, described, geolocated activity with a start/end time window.
///
/// `start <= end` is assumed but not enforced; an inverted window simply
/// never resolves [`EventStatus::Live`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Display name, at most 80 characters.
    pub title: String,
    /// Description, at most 200 characters.
    pub description: String,
    /// When the window opens.
    pub start: DateTime<Utc>,
    /// When the window closes (inclusive).
    pub end: DateTime<Utc>,
    /// Latitude of the event location.
    pub latitude: Decimal,
    /// Longitude of the event location.
    pub longitude: Decimal,
}

impl Event {
    /// Resolve this event's status at the given instant.
    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        EventStatus::resolve(self.start, self.end, now)
    }
}

// ---------------------------------------------------------------------------
// Participation
// ---------------------------------------------------------------------------

/// An append-only record of one score submission by one player for one
/// event. Never updated or deleted once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    /// Unique participation identifier.
    pub id: ParticipationId,
    /// The submitting player.
    pub player_id: PlayerId,
    /// The event played.
    pub event_id: EventId,
    /// The score submitted for this attempt.
    pub score: i64,
    /// When the score was submitted.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// TreasureChest
// ---------------------------------------------------------------------------

/// A standalone geolocated collectible with a fixed point value.
///
/// Unrelated to events in the data model; managed exclusively by game
/// masters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureChest {
    /// Unique chest identifier.
    pub id: ChestId,
    /// Display name, at most 80 characters.
    pub name: String,
    /// Point value awarded for collecting the chest.
    pub points: i64,
    /// Latitude of the chest location.
    pub latitude: Decimal,
    /// Longitude of the chest location.
    pub longitude: Decimal,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An opaque server-side session: a bearer token bound to one identity.
///
/// The token rides an `HttpOnly` cookie; the record is the only state the
/// server keeps between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The opaque bearer token.
    pub token: Uuid,
    /// The identity this session authenticates.
    pub user_id: UserId,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// When the session stops being honored.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is still valid at the given instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
