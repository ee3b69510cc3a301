//! HTTP server for the Geohunt game.
//!
//! This crate provides an Axum server that exposes the whole game
//! surface: the public home page, the player routes (live events, play,
//! leaderboard, profiles), account routes (register, login, logout,
//! email updates), and the game-master CRUD routes for events and
//! treasure chests.
//!
//! # Architecture
//!
//! Handlers hold no domain logic. Each one resolves the session cookie
//! to a caller (via the extractors in [`session`]), hands the explicit
//! caller to a `geohunt-game` service, and maps the result through
//! [`error::ApiError`] into a JSON body or a redirect. The store behind
//! [`state::AppState`] is the repository seam, so router tests run
//! against the in-memory backend.

pub mod account;
pub mod config;
pub mod error;
pub mod manage;
pub mod play;
pub mod router;
pub mod server;
pub mod session;
pub mod state;

// Re-export primary types for convenience.
pub use config::AppConfig;
pub use error::ApiError;
pub use router::build_router;
pub use server::{start_server, ServerError};
pub use state::AppState;
