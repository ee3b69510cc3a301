//! Registration, login, sessions, and account maintenance.
//!
//! Registration creates exactly one [`Identity`] and one [`Player`]
//! (zero points, member role) and logs the new account in, matching the
//! original flow. Login failures are uniform: the caller cannot tell an
//! unknown handle from a wrong password.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use geohunt_store::{NewIdentity, Store, StoreError};
use geohunt_types::{Participation, Player, PlayerId, Role, Session, UserId};

use crate::error::GameError;
use crate::password::{hash_password, verify_password};
use crate::policy::{require_authenticated, Caller};

/// Form input for `POST /register/`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    /// Desired login handle.
    #[validate(length(min = 3, max = 30, message = "must be 3 to 30 characters"))]
    pub username: String,
    /// Contact address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Plaintext password; hashed before it reaches the store.
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

/// Form input for `POST /login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    /// Login handle.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Form input for `POST /update_email/`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEmailInput {
    /// The new contact address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// A player's public profile as served by `GET /users/{username}/`.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// Login handle.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Accumulated points.
    pub points: i64,
    /// Privilege level.
    pub role: Role,
    /// Score submissions, most recent first.
    pub participations: Vec<Participation>,
}

/// Build a fresh session for an identity.
fn open_session(user_id: UserId, ttl: TimeDelta) -> Session {
    let now = Utc::now();
    Session {
        // v4: session tokens must be unpredictable, not time-ordered.
        token: Uuid::new_v4(),
        user_id,
        created_at: now,
        expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
    }
}

/// Register a new account: one identity, one member player, auto-login.
///
/// # Errors
///
/// Returns [`GameError::Validation`] for malformed input or a taken
/// username; store failures pass through.
pub async fn register(
    store: &dyn Store,
    input: RegisterInput,
    session_ttl: TimeDelta,
) -> Result<(Caller, Session), GameError> {
    input.validate()?;

    let password_hash = hash_password(&input.password)?;
    let identity = store
        .create_identity(NewIdentity {
            username: input.username,
            password_hash,
            email: input.email,
        })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateUsername(_) => {
                GameError::field("username", "taken", "username already taken")
            }
            other => GameError::Store(other),
        })?;

    let player = Player::new(PlayerId::new(), identity.id);
    store.create_player(player.clone()).await?;

    let session = open_session(identity.id, session_ttl);
    store.create_session(session.clone()).await?;

    tracing::info!(username = %identity.username, "Registered new player");
    Ok((Caller { identity, player }, session))
}

/// Authenticate credentials and open a session.
///
/// # Errors
///
/// Returns [`GameError::AuthenticationFailure`] for an unknown handle or
/// a wrong password -- deliberately indistinguishable.
pub async fn login(
    store: &dyn Store,
    input: LoginInput,
    session_ttl: TimeDelta,
) -> Result<(Caller, Session), GameError> {
    let Some(identity) = store.get_identity_by_username(&input.username).await? else {
        return Err(GameError::AuthenticationFailure);
    };

    if !verify_password(&input.password, &identity.password_hash)? {
        return Err(GameError::AuthenticationFailure);
    }

    let Some(player) = store.get_player_by_user(identity.id).await? else {
        // An identity without a player record cannot play; treat it the
        // same as bad credentials rather than leaking account state.
        return Err(GameError::AuthenticationFailure);
    };

    let session = open_session(identity.id, session_ttl);
    store.create_session(session.clone()).await?;

    tracing::info!(username = %identity.username, "Player logged in");
    Ok((Caller { identity, player }, session))
}

/// End a session. Unknown tokens are ignored, so logout is idempotent.
pub async fn logout(store: &dyn Store, token: Uuid) -> Result<(), GameError> {
    store.delete_session(token).await?;
    Ok(())
}

/// Resolve a session token to its caller, if the session is still valid.
///
/// Expired or dangling sessions resolve to `None`; they are not errors.
pub async fn authenticate_session(
    store: &dyn Store,
    token: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<Caller>, GameError> {
    let Some(session) = store.get_session(token).await? else {
        return Ok(None);
    };
    if !session.is_valid_at(now) {
        return Ok(None);
    }

    let Some(identity) = store.get_identity(session.user_id).await? else {
        return Ok(None);
    };
    let Some(player) = store.get_player_by_user(identity.id).await? else {
        return Ok(None);
    };

    Ok(Some(Caller { identity, player }))
}

/// Change the caller's own contact address.
pub async fn update_email(
    store: &dyn Store,
    caller: Option<&Caller>,
    input: UpdateEmailInput,
) -> Result<(), GameError> {
    let caller = require_authenticated(caller)?;
    input.validate()?;

    if !store.update_email(caller.identity.id, &input.email).await? {
        return Err(GameError::NotFound("user"));
    }

    tracing::info!(username = %caller.identity.username, "Updated email");
    Ok(())
}

/// Fetch a player's public profile by username. Requires authentication.
pub async fn view_profile(
    store: &dyn Store,
    caller: Option<&Caller>,
    username: &str,
) -> Result<Profile, GameError> {
    require_authenticated(caller)?;

    let Some(identity) = store.get_identity_by_username(username).await? else {
        return Err(GameError::NotFound("user"));
    };
    let Some(player) = store.get_player_by_user(identity.id).await? else {
        return Err(GameError::NotFound("user"));
    };
    let participations = store.list_participations(player.id).await?;

    Ok(Profile {
        username: identity.username,
        email: identity.email,
        points: player.points,
        role: player.role,
        participations,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic, clippy::arithmetic_side_effects)]

    use geohunt_store::{IdentityRepo, MemoryStore};

    use super::*;

    fn ttl() -> TimeDelta {
        TimeDelta::hours(12)
    }

    fn alice_input() -> RegisterInput {
        RegisterInput {
            username: String::from("alice"),
            email: String::from("alice@example.com"),
            password: String::from("hunter2hunter2"),
        }
    }

    #[tokio::test]
    async fn register_creates_identity_and_member_player() {
        let store = MemoryStore::new();
        let (caller, session) = register(&store, alice_input(), ttl()).await.unwrap();

        assert_eq!(caller.identity.username, "alice");
        assert_eq!(caller.player.points, 0);
        assert_eq!(caller.player.role, Role::Member);
        assert_eq!(session.user_id, caller.identity.id);

        // The stored hash is Argon2, not the plaintext.
        let stored = store
            .get_identity_by_username("alice")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn register_rejects_taken_username_as_field_error() {
        let store = MemoryStore::new();
        register(&store, alice_input(), ttl()).await.unwrap();

        let err = register(&store, alice_input(), ttl()).await.unwrap_err();
        match err {
            GameError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("username"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let store = MemoryStore::new();
        let input = RegisterInput {
            username: String::from("al"),
            email: String::from("not-an-email"),
            password: String::from("short"),
        };
        let err = register(&store, input, ttl()).await.unwrap_err();
        match err {
            GameError::Validation(errors) => {
                let fields = errors.field_errors();
                assert!(fields.contains_key("username"));
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("password"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_failure_is_uniform() {
        let store = MemoryStore::new();
        register(&store, alice_input(), ttl()).await.unwrap();

        let unknown = login(
            &store,
            LoginInput {
                username: String::from("mallory"),
                password: String::from("hunter2hunter2"),
            },
            ttl(),
        )
        .await
        .unwrap_err();
        let wrong_password = login(
            &store,
            LoginInput {
                username: String::from("alice"),
                password: String::from("wrong-password"),
            },
            ttl(),
        )
        .await
        .unwrap_err();

        assert!(matches!(unknown, GameError::AuthenticationFailure));
        assert!(matches!(wrong_password, GameError::AuthenticationFailure));
    }

    #[tokio::test]
    async fn session_resolves_then_expires() {
        let store = MemoryStore::new();
        let (_, session) = register(&store, alice_input(), ttl()).await.unwrap();

        let now = Utc::now();
        let caller = authenticate_session(&store, session.token, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(caller.identity.username, "alice");

        let later = now + TimeDelta::hours(13);
        assert!(authenticate_session(&store, session.token, later)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn logout_invalidates_the_session_idempotently() {
        let store = MemoryStore::new();
        let (_, session) = register(&store, alice_input(), ttl()).await.unwrap();

        logout(&store, session.token).await.unwrap();
        logout(&store, session.token).await.unwrap();
        assert!(authenticate_session(&store, session.token, Utc::now())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_email_requires_authentication() {
        let store = MemoryStore::new();
        let err = update_email(
            &store,
            None,
            UpdateEmailInput {
                email: String::from("new@example.com"),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GameError::Unauthenticated));
    }

    #[tokio::test]
    async fn update_email_changes_own_address() {
        let store = MemoryStore::new();
        let (caller, _) = register(&store, alice_input(), ttl()).await.unwrap();

        update_email(
            &store,
            Some(&caller),
            UpdateEmailInput {
                email: String::from("new@example.com"),
            },
        )
        .await
        .unwrap();

        let stored = store
            .get_identity_by_username("alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.email, "new@example.com");
    }

    #[tokio::test]
    async fn profile_requires_auth_and_reports_missing_users() {
        let store = MemoryStore::new();
        let (caller, _) = register(&store, alice_input(), ttl()).await.unwrap();

        assert!(matches!(
            view_profile(&store, None, "alice").await.unwrap_err(),
            GameError::Unauthenticated
        ));
        assert!(matches!(
            view_profile(&store, Some(&caller), "nobody")
                .await
                .unwrap_err(),
            GameError::NotFound("user")
        ));

        let profile = view_profile(&store, Some(&caller), "alice").await.unwrap();
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.points, 0);
        assert!(profile.participations.is_empty());
    }
}
