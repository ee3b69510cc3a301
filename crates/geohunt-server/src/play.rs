//! Player-facing routes: home, live events, score submission, leaderboard.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::Utc;
use geohunt_game::scoring::{self, ScoreInput};
use geohunt_game::{events, leaderboard};
use geohunt_types::{Event, EventId};

use crate::error::ApiError;
use crate::session::{MaybeUser, RequireUser};
use crate::state::AppState;

/// `GET /` -- the home page: top players, open to anonymous visitors.
pub async fn home(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let top = leaderboard::top_players(state.store.as_ref())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(serde_json::json!({
        "username": caller.map(|c| c.identity.username),
        "top_players": top,
    })))
}

/// `GET /game/` -- the events live right now. Login-gated.
pub async fn live_events(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
) -> Result<Json<Vec<Event>>, ApiError> {
    let live = events::list_live(state.store.as_ref(), caller.as_ref(), Utc::now())
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(live))
}

/// `GET /game/{event_id}/` -- the play page for one event.
///
/// Only reachable while the event is live; out-of-window events refuse
/// the same way the submission path does.
pub async fn play_page(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(event_id): Path<EventId>,
) -> Result<Json<Event>, ApiError> {
    let event = scoring::playable_event(state.store.as_ref(), caller.as_ref(), event_id, Utc::now())
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(event))
}

/// `POST /game/{event_id}/` -- submit a score, then show the caller
/// their own profile.
pub async fn submit_score(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(event_id): Path<EventId>,
    Form(input): Form<ScoreInput>,
) -> Result<Response, ApiError> {
    let username = caller
        .as_ref()
        .map_or_else(String::new, |c| c.identity.username.clone());
    scoring::submit_score(
        state.store.as_ref(),
        caller.as_ref(),
        event_id,
        input,
        Utc::now(),
    )
    .await
    .map_err(|e| ApiError::from_game(e, uri.path()))?;

    Ok(Redirect::to(&format!("/users/{username}/")).into_response())
}

/// `GET /leaderboard/` -- the top 10 players. Login-gated.
pub async fn top_players(
    State(state): State<Arc<AppState>>,
    RequireUser(_caller): RequireUser,
) -> Result<Json<Vec<leaderboard::LeaderboardEntry>>, ApiError> {
    let top = leaderboard::top_players(state.store.as_ref())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(top))
}
