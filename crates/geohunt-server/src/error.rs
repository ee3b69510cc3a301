//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. The
//! mapping is deliberate: validation problems surface per-field messages,
//! missing records are generic 404s, unauthenticated requests to gated
//! pages redirect to the login form with a `next` parameter, and
//! privilege failures are uniform 403s.

use std::collections::BTreeMap;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use geohunt_game::GameError;
use validator::ValidationErrors;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The caller must log in first; redirect to the login form and come
    /// back to the original path afterwards.
    #[error("login required")]
    LoginRedirect(String),

    /// Malformed input; carries per-field messages.
    #[error("validation failed")]
    Validation(ValidationErrors),

    /// The requested resource was not found.
    #[error("not found")]
    NotFound,

    /// The caller lacks the privileges for this operation.
    #[error("access denied")]
    AccessDenied,

    /// Login was refused. Uniform for unknown handles and wrong passwords.
    #[error("username/password incorrect")]
    AuthenticationFailure,

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Map a domain error onto an API error.
    ///
    /// `Unauthenticated` needs the request path to build the login
    /// redirect, so callers supply it here.
    pub fn from_game(err: GameError, path: &str) -> Self {
        match err {
            GameError::Validation(errors) => Self::Validation(errors),
            GameError::NotFound(_) => Self::NotFound,
            GameError::Unauthenticated => Self::LoginRedirect(path.to_owned()),
            GameError::AccessDenied => Self::AccessDenied,
            GameError::AuthenticationFailure => Self::AuthenticationFailure,
            GameError::Store(e) => Self::Internal(e.to_string()),
            GameError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// Flatten [`ValidationErrors`] into a field -> messages map for the
/// response body.
fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .collect();
            ((*field).to_string(), messages)
        })
        .collect()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::LoginRedirect(next) => {
                let location = format!("/login/?next={next}");
                (
                    StatusCode::SEE_OTHER,
                    [(header::LOCATION, location)],
                )
                    .into_response()
            }
            Self::Validation(errors) => {
                let body = serde_json::json!({
                    "error": "validation failed",
                    "fields": field_messages(&errors),
                    "status": StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                });
                (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
            }
            Self::NotFound => {
                status_body(StatusCode::NOT_FOUND, "not found")
            }
            Self::AccessDenied => {
                status_body(StatusCode::FORBIDDEN, "access denied")
            }
            Self::AuthenticationFailure => {
                status_body(StatusCode::UNAUTHORIZED, "username/password incorrect")
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error serving request");
                status_body(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

fn status_body(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "error": message,
        "status": status.as_u16(),
    });
    (status, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn unauthenticated_maps_to_login_redirect_with_next() {
        let err = ApiError::from_game(GameError::Unauthenticated, "/game/");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(header::LOCATION).unwrap();
        assert_eq!(location, "/login/?next=/game/");
    }

    #[test]
    fn not_found_hides_the_looked_up_value() {
        let err = ApiError::from_game(GameError::NotFound("event"), "/game/");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_surface_field_messages() {
        let err = ApiError::from_game(
            geohunt_game::GameError::field("username", "taken", "username already taken"),
            "/register/",
        );
        match err {
            ApiError::Validation(errors) => {
                let messages = field_messages(&errors);
                assert_eq!(
                    messages.get("username").unwrap(),
                    &vec![String::from("username already taken")]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
