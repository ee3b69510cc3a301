//! Account routes: registration, login, logout, email updates, profiles.
//!
//! Form GETs return the form's field schema as JSON; successful POSTs
//! follow the redirect discipline (303 to the page the browser should
//! land on next). Login and registration install the session cookie on
//! the way out.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, Uri};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use geohunt_game::auth::{self, LoginInput, RegisterInput, UpdateEmailInput};
use serde::Deserialize;

use crate::error::ApiError;
use crate::session::{clear_session_cookie, session_token, set_session_cookie, MaybeUser, RequireUser};
use crate::state::AppState;

/// Query string of `GET /login/`, carrying the page to return to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    /// Path to redirect to after a successful login.
    #[serde(default)]
    pub next: Option<String>,
}

/// Form body of `POST /login/`: credentials plus the optional return path.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    /// Login handle.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// Path to redirect to after a successful login.
    #[serde(default)]
    pub next: Option<String>,
}

/// Page to land on after login when no usable `next` value was given.
const DEFAULT_POST_LOGIN_PATH: &str = "/game/";

/// Restrict a `next` value to local paths.
///
/// Only same-site absolute paths are honored; anything that a browser
/// could treat as another origin (full URLs, scheme-relative `//host`
/// forms) falls back to the game page.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => DEFAULT_POST_LOGIN_PATH,
    }
}

/// `GET /register/` -- the registration form schema.
#[allow(clippy::unused_async)]
pub async fn register_form() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "form": "register",
        "fields": ["username", "email", "password"],
        "method": "POST",
        "action": "/register/",
    }))
}

/// `POST /register/` -- create the account, log it in, and head to the game.
pub async fn register(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Form(input): Form<RegisterInput>,
) -> Result<Response, ApiError> {
    let (_, session) = auth::register(state.store.as_ref(), input, state.session_ttl)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;

    let cookie = set_session_cookie(
        &state.cookie_name,
        session.token,
        state.session_ttl.num_seconds(),
    );
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/game/")).into_response())
}

/// `GET /login/` -- the login form schema, echoing the `next` target.
#[allow(clippy::unused_async)]
pub async fn login_form(Query(query): Query<NextQuery>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "form": "login",
        "fields": ["username", "password"],
        "method": "POST",
        "action": "/login/",
        "next": query.next,
    }))
}

/// `POST /login/` -- authenticate and install the session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let input = LoginInput {
        username: form.username,
        password: form.password,
    };
    let (_, session) = auth::login(state.store.as_ref(), input, state.session_ttl)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;

    let cookie = set_session_cookie(
        &state.cookie_name,
        session.token,
        state.session_ttl.num_seconds(),
    );
    let destination = safe_next(form.next.as_deref());
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(destination)).into_response())
}

/// `GET /logout/` -- drop the session and return home.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = session_token(&headers, &state.cookie_name) {
        auth::logout(state.store.as_ref(), token)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }
    let cookie = clear_session_cookie(&state.cookie_name);
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/")).into_response())
}

/// `GET /update_email/` -- the email form schema. Login-gated.
#[allow(clippy::unused_async)]
pub async fn update_email_form(RequireUser(caller): RequireUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "form": "update_email",
        "fields": ["email"],
        "method": "POST",
        "action": "/update_email/",
        "current": caller.identity.email,
    }))
}

/// `POST /update_email/` -- change the caller's own address, then show
/// their profile.
pub async fn update_email(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Form(input): Form<UpdateEmailInput>,
) -> Result<Response, ApiError> {
    let username = caller
        .as_ref()
        .map_or_else(String::new, |c| c.identity.username.clone());
    auth::update_email(state.store.as_ref(), caller.as_ref(), input)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;

    Ok(Redirect::to(&format!("/users/{username}/")).into_response())
}

/// `GET /users/{username}/` -- a player's public profile. Login-gated.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    MaybeUser(caller): MaybeUser,
    uri: Uri,
    Path(username): Path<String>,
) -> Result<Json<auth::Profile>, ApiError> {
    let profile = auth::view_profile(state.store.as_ref(), caller.as_ref(), &username)
        .await
        .map_err(|e| ApiError::from_game(e, uri.path()))?;
    Ok(Json(profile))
}
