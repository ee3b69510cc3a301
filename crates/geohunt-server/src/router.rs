//! Axum router construction.
//!
//! Assembles the full route table into a single [`Router`] with CORS and
//! request tracing middleware.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{account, manage, play};

/// Build the complete Axum router.
///
/// The route table:
/// - `GET /` -- home, top players, open to anonymous visitors
/// - `GET /game/` -- events live right now
/// - `GET|POST /game/{event_id}/` -- play page / score submission
/// - `GET /leaderboard/` -- top 10 players
/// - `GET|POST /login/`, `GET /logout/`, `GET|POST /register/`
/// - `GET /users/{username}/`, `GET|POST /update_email/`
/// - `GET /events/`, `GET /events/{id}/` -- any logged-in player
/// - `GET|POST /events/new/`, `GET|POST /events/{id}/update`,
///   `POST /events/{id}/delete` -- game masters
/// - `/treasure_chests/...` -- same shape as events, entirely game-master
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Home and play
        .route("/", get(play::home))
        .route("/game/", get(play::live_events))
        .route("/game/{event_id}/", get(play::play_page).post(play::submit_score))
        .route("/leaderboard/", get(play::top_players))
        // Accounts
        .route("/login/", get(account::login_form).post(account::login))
        .route("/logout/", get(account::logout))
        .route("/register/", get(account::register_form).post(account::register))
        .route("/users/{username}/", get(account::profile))
        .route(
            "/update_email/",
            get(account::update_email_form).post(account::update_email),
        )
        // Event management
        .route("/events/", get(manage::list_events))
        .route("/events/new/", get(manage::new_event_form).post(manage::create_event))
        .route("/events/{id}/", get(manage::get_event))
        .route(
            "/events/{id}/update",
            get(manage::update_event_form).post(manage::update_event),
        )
        .route("/events/{id}/delete", post(manage::delete_event))
        // Treasure chest management
        .route("/treasure_chests/", get(manage::list_chests))
        .route(
            "/treasure_chests/new/",
            get(manage::new_chest_form).post(manage::create_chest),
        )
        .route("/treasure_chests/{id}/", get(manage::get_chest))
        .route(
            "/treasure_chests/{id}/update",
            get(manage::update_chest_form).post(manage::update_chest),
        )
        .route("/treasure_chests/{id}/delete", post(manage::delete_chest))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
