//! Shared type definitions for the Geohunt game.
//!
//! This crate is the single source of truth for all types used across the
//! Geohunt workspace: entity structs, strongly-typed identifiers, and the
//! enumerations they reference.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (event status, player role)
//! - [`entities`] -- Core entity structs (identities, players, events,
//!   participations, treasure chests, sessions)

pub mod entities;
pub mod enums;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use entities::{Event, Identity, Participation, Player, Session, TreasureChest};
pub use enums::{EventStatus, Role};
pub use ids::{ChestId, EventId, ParticipationId, PlayerId, UserId};
