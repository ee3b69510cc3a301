//! Session cookie plumbing and caller extractors.
//!
//! The session token travels in an `HttpOnly` cookie. Handlers never
//! touch headers themselves: [`RequireUser`] yields an authenticated
//! [`Caller`] or rejects with a redirect to the login form, and
//! [`MaybeUser`] yields `Option<Caller>` for routes that work either way.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::{HeaderMap, COOKIE};
use axum::http::request::Parts;
use chrono::Utc;
use geohunt_game::{auth, Caller};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Pull the session token out of the `Cookie` header, if present.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == cookie_name {
            value.parse().ok()
        } else {
            None
        }
    })
}

/// Build the `Set-Cookie` value that installs a session.
pub fn set_session_cookie(cookie_name: &str, token: Uuid, max_age_seconds: i64) -> String {
    format!("{cookie_name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}")
}

/// Build the `Set-Cookie` value that clears the session.
pub fn clear_session_cookie(cookie_name: &str) -> String {
    format!("{cookie_name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extractor yielding the authenticated caller.
///
/// Rejects with a `303 See Other` to `/login/?next=<path>` when there is
/// no valid session, matching the behavior of every login-gated page.
#[derive(Debug)]
pub struct RequireUser(pub Caller);

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_owned();
        resolve_caller(&parts.headers, state)
            .await?
            .map(Self)
            .ok_or(ApiError::LoginRedirect(path))
    }
}

/// Extractor yielding the caller when a valid session exists.
///
/// Never rejects on a missing or expired session; routes like the home
/// page serve anonymous visitors too.
#[derive(Debug)]
pub struct MaybeUser(pub Option<Caller>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_caller(&parts.headers, state).await?))
    }
}

/// Resolve the session cookie to a caller, if any.
async fn resolve_caller(
    headers: &HeaderMap,
    state: &Arc<AppState>,
) -> Result<Option<Caller>, ApiError> {
    let Some(token) = session_token(headers, &state.cookie_name) else {
        return Ok(None);
    };
    auth::authenticate_session(state.store.as_ref(), token, Utc::now())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn token_is_found_among_other_cookies() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; geohunt_session={token}; lang=en"))
                .unwrap(),
        );
        assert_eq!(session_token(&headers, "geohunt_session"), Some(token));
    }

    #[test]
    fn malformed_or_absent_cookies_yield_none() {
        let headers = HeaderMap::new();
        assert_eq!(session_token(&headers, "geohunt_session"), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("geohunt_session=not-a-uuid"),
        );
        assert_eq!(session_token(&headers, "geohunt_session"), None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let value = clear_session_cookie("geohunt_session");
        assert!(value.contains("Max-Age=0"));
        assert!(value.starts_with("geohunt_session=;"));
    }
}
