//! Game-master management routes for events and treasure chests.
//!
//! Event reads are open to any logged-in player; everything else sits
//! behind the game-master gate in the domain layer. Form GETs return the
//! field schema (pre-filled on the update forms); successful mutations
//! redirect to the detail or list page.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use geohunt_game::chests::{self, ChestInput};
use geohunt_game::events::{self, EventInput};
use geohunt_game::policy::require_game_master;
use geohunt_types::{ChestId, Event, EventId, TreasureChest};

use crate::error::ApiError;
use crate::session::MaybeUser;
use crate::state::AppState;

/// `GET /events/` -- every event, ordered by end instant. Login-gated.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
) -> Result<Json<Vec<Event>>, ApiError> {
    let all = events::list(state.store.as_ref(), caller.as_ref())
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(all))
}

/// `GET /events/{id}/` -- one event. Login-gated.
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(id): Path<EventId>,
) -> Result<Json<Event>, ApiError> {
    let event = events::get(state.store.as_ref(), caller.as_ref(), id)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(event))
}

/// `GET /events/new/` -- the event creation form schema. Game masters only.
#[allow(clippy::unused_async)]
pub async fn new_event_form(
    MaybeUser(caller): MaybeUser,
    uri: Uri,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_game_master(caller.as_ref()).map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(event_form_schema("/events/new/", None)))
}

/// `POST /events/new/` -- create an event, then show its detail page.
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Form(input): Form<EventInput>,
) -> Result<Response, ApiError> {
    let event = events::create(state.store.as_ref(), caller.as_ref(), input)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Redirect::to(&format!("/events/{}/", event.id)).into_response())
}

/// `GET /events/{id}/update` -- the update form, pre-filled. Game masters only.
pub async fn update_event_form(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(id): Path<EventId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_game_master(caller.as_ref()).map_err(|e| ApiError::from_game(e, uri.path()))?;
    let event = events::get(state.store.as_ref(), caller.as_ref(), id)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(event_form_schema(
        &format!("/events/{id}/update"),
        Some(&event),
    )))
}

/// `POST /events/{id}/update` -- replace an event, then show its detail page.
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(id): Path<EventId>,
    Form(input): Form<EventInput>,
) -> Result<Response, ApiError> {
    let event = events::update(state.store.as_ref(), caller.as_ref(), id, input)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Redirect::to(&format!("/events/{}/", event.id)).into_response())
}

/// `POST /events/{id}/delete` -- delete an event, then show the list.
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(id): Path<EventId>,
) -> Result<Response, ApiError> {
    events::delete(state.store.as_ref(), caller.as_ref(), id)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Redirect::to("/events/").into_response())
}

/// `GET /treasure_chests/` -- every chest. Game masters only.
pub async fn list_chests(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
) -> Result<Json<Vec<TreasureChest>>, ApiError> {
    let all = chests::list(state.store.as_ref(), caller.as_ref())
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(all))
}

/// `GET /treasure_chests/{id}/` -- one chest. Game masters only.
pub async fn get_chest(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(id): Path<ChestId>,
) -> Result<Json<TreasureChest>, ApiError> {
    let chest = chests::get(state.store.as_ref(), caller.as_ref(), id)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(chest))
}

/// `GET /treasure_chests/new/` -- the chest creation form schema.
#[allow(clippy::unused_async)]
pub async fn new_chest_form(
    MaybeUser(caller): MaybeUser,
    uri: Uri,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_game_master(caller.as_ref()).map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(chest_form_schema("/treasure_chests/new/", None)))
}

/// `POST /treasure_chests/new/` -- create a chest, then show its detail page.
pub async fn create_chest(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Form(input): Form<ChestInput>,
) -> Result<Response, ApiError> {
    let chest = chests::create(state.store.as_ref(), caller.as_ref(), input)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Redirect::to(&format!("/treasure_chests/{}/", chest.id)).into_response())
}

/// `GET /treasure_chests/{id}/update` -- the update form, pre-filled.
pub async fn update_chest_form(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(id): Path<ChestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let chest = chests::get(state.store.as_ref(), caller.as_ref(), id)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(chest_form_schema(
        &format!("/treasure_chests/{id}/update"),
        Some(&chest),
    )))
}

/// `POST /treasure_chests/{id}/update` -- replace a chest, then show its
/// detail page.
pub async fn update_chest(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(id): Path<ChestId>,
    Form(input): Form<ChestInput>,
) -> Result<Response, ApiError> {
    let chest = chests::update(state.store.as_ref(), caller.as_ref(), id, input)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Redirect::to(&format!("/treasure_chests/{}/", chest.id)).into_response())
}

/// `POST /treasure_chests/{id}/delete` -- delete a chest, then show the list.
pub async fn delete_chest(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(id): Path<ChestId>,
) -> Result<Response, ApiError> {
    chests::delete(state.store.as_ref(), caller.as_ref(), id)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Redirect::to("/treasure_chests/").into_response())
}

/// Field schema for the event form, optionally pre-filled.
fn event_form_schema(action: &str, current: Option<&Event>) -> serde_json::Value {
    serde_json::json!({
        "form": "event",
        "fields": ["title", "description", "start", "end", "latitude", "longitude"],
        "method": "POST",
        "action": action,
        "current": current,
    })
}

/// Field schema for the chest form, optionally pre-filled.
fn chest_form_schema(action: &str, current: Option<&TreasureChest>) -> serde_json::Value {
    serde_json::json!({
        "form": "treasure_chest",
        "fields": ["name", "points", "latitude", "longitude"],
        "method": "POST",
        "action": action,
        "current": current,
    })
}
