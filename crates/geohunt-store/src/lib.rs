//! Repository layer for the Geohunt game.
//!
//! The source system leaned on an ORM; here the persistence seam is a set
//! of explicit repository traits (one per entity) bundled into the
//! [`Store`] supertrait. Two backends implement them:
//!
//! - [`PgStore`] -- `PostgreSQL` via [`sqlx`] with runtime query
//!   construction (no live database needed at build time) and embedded
//!   migrations. This is the production backend.
//! - [`MemoryStore`] -- `RwLock`-protected maps, used by unit and router
//!   tests and for local development without a database.
//!
//! # Modules
//!
//! - [`repo`] -- Repository traits and input parameter structs
//! - [`postgres`] -- `PostgreSQL` pool setup and embedded migrations
//! - [`accounts`] -- Identity and session persistence
//! - [`players`] -- Player persistence and the leaderboard query
//! - [`events`] -- Event persistence and the live-window query
//! - [`participations`] -- Atomic score recording
//! - [`chests`] -- Treasure chest persistence
//! - [`memory`] -- In-memory backend
//! - [`error`] -- Shared error type

pub mod accounts;
pub mod chests;
pub mod error;
pub mod events;
pub mod memory;
pub mod participations;
pub mod players;
pub mod postgres;
pub mod repo;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repo::{
    ChestRepo, EventRepo, IdentityRepo, NewIdentity, ParticipationRepo, PlayerRepo, SessionRepo,
    Store,
};
