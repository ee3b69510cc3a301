//! Domain services for the Geohunt game.
//!
//! Every operation here takes the store seam (`&dyn Store`) and an
//! explicit caller -- there is no ambient request or session context.
//! The HTTP layer resolves a cookie to a [`Caller`] and passes it down;
//! tests pass one directly.
//!
//! # Modules
//!
//! - [`auth`] -- Registration, login, logout, sessions, email updates
//! - [`password`] -- Argon2 password hashing and verification
//! - [`policy`] -- The game-master gate and the authenticated-caller check
//! - [`scoring`] -- Score submission against live events
//! - [`leaderboard`] -- Top players by accumulated points
//! - [`events`] -- Event reads and game-master-only mutations
//! - [`chests`] -- Treasure chest operations, all game-master-only
//! - [`coords`] -- Coordinate range validators shared by the form inputs
//! - [`error`] -- The domain error taxonomy

pub mod auth;
pub mod chests;
pub mod coords;
pub mod error;
pub mod events;
pub mod leaderboard;
pub mod password;
pub mod policy;
pub mod scoring;

// Re-export primary types for convenience.
pub use error::GameError;
pub use policy::Caller;
