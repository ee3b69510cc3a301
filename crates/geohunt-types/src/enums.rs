//! Enumeration types for the Geohunt game.
//!
//! [`EventStatus`] is the only derived, time-dependent value in the data
//! model. [`Role`] replaces the source system's boolean game-master flag
//! with an explicit enumerated role so the access policy has a single
//! typed predicate to check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event status
// ---------------------------------------------------------------------------

/// Where an event's time window sits relative to a given instant.
///
/// Exactly one variant holds for any `(start, end, now)` triple. Both
/// boundaries are inclusive of [`EventStatus::Live`]: an event is live at
/// its start instant and still live at its end instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    /// The window has not opened yet (`now < start`).
    Future,
    /// The window is open (`start <= now <= end`).
    Live,
    /// The window has closed (`now > end`).
    Past,
}

impl EventStatus {
    /// Resolve the status of a time window at the given instant.
    ///
    /// Pure function of three timestamps; no side effects, no failure
    /// modes. A window with `start > end` can never be live.
    pub fn resolve(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start {
            Self::Future
        } else if now <= end {
            Self::Live
        } else {
            Self::Past
        }
    }

    /// Whether this status is [`EventStatus::Live`].
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

impl core::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Future => write!(f, "Future"),
            Self::Live => write!(f, "Live"),
            Self::Past => write!(f, "Past"),
        }
    }
}

// ---------------------------------------------------------------------------
// Player role
// ---------------------------------------------------------------------------

/// The privilege level of a player.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// An ordinary player: may play live events and submit scores.
    #[default]
    Member,
    /// A game master: may additionally manage events and treasure chests.
    GameMaster,
}

impl Role {
    /// Whether this role carries game-master privileges.
    pub const fn is_game_master(self) -> bool {
        matches!(self, Self::GameMaster)
    }

    /// The database representation of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::GameMaster => "game_master",
        }
    }

    /// Parse a role from its database representation.
    ///
    /// Returns `None` for unknown strings.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "member" => Some(Self::Member),
            "game_master" => Some(Self::GameMaster),
            _ => None,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
