//! The scoring flow: submitting a score for a live event.
//!
//! A submission is accepted only while the event's window contains the
//! submission instant (both boundaries inclusive). Acceptance has two
//! durable effects -- an appended participation and a credit to the
//! player's total -- applied atomically by the store.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use geohunt_store::Store;
use geohunt_types::{Event, EventId, Participation};

use crate::error::GameError;
use crate::policy::{require_authenticated, Caller};

/// Form input for `POST /game/{event_id}/`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScoreInput {
    /// The score achieved for this attempt.
    pub score: i64,
}

/// Load an event for play, refusing unless it is live at `now`.
///
/// Backs `GET /game/{event_id}/`: the play page is only reachable while
/// the window is open, same as the submission path.
///
/// # Errors
///
/// [`GameError::Unauthenticated`] for anonymous callers,
/// [`GameError::NotFound`] for unknown events, and
/// [`GameError::AccessDenied`] for events outside their window.
pub async fn playable_event(
    store: &dyn Store,
    caller: Option<&Caller>,
    event_id: EventId,
    now: DateTime<Utc>,
) -> Result<Event, GameError> {
    require_authenticated(caller)?;

    let Some(event) = store.get_event(event_id).await? else {
        return Err(GameError::NotFound("event"));
    };
    if !event.status_at(now).is_live() {
        return Err(GameError::AccessDenied);
    }
    Ok(event)
}

/// Submit a score for an event.
///
/// Refused with no state change unless the caller is authenticated and
/// the event is live at `now`.
pub async fn submit_score(
    store: &dyn Store,
    caller: Option<&Caller>,
    event_id: EventId,
    input: ScoreInput,
    now: DateTime<Utc>,
) -> Result<Participation, GameError> {
    let caller = require_authenticated(caller)?;

    let Some(event) = store.get_event(event_id).await? else {
        return Err(GameError::NotFound("event"));
    };
    if !event.status_at(now).is_live() {
        return Err(GameError::AccessDenied);
    }

    let participation = store
        .record_score(caller.player.id, event.id, input.score)
        .await?;

    tracing::info!(
        username = %caller.identity.username,
        event_id = %event.id,
        score = input.score,
        "Score submitted"
    );
    Ok(participation)
}
