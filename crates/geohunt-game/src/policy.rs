//! The access policy: who may do what.
//!
//! Two predicates cover the whole system: "is someone logged in" and
//! "is that someone a game master". Both live here so every mutation
//! endpoint goes through the same gate instead of scattering inline
//! checks, and both refuse uniformly -- the caller learns nothing about
//! which record or flag was involved.

use geohunt_types::{Identity, Player};

use crate::error::GameError;

/// The resolved identity acting on a request.
///
/// Built once at the HTTP boundary from the session cookie and passed
/// explicitly into every domain operation. Absence (`Option::None`)
/// means the request is anonymous.
#[derive(Debug, Clone)]
pub struct Caller {
    /// The authenticated account.
    pub identity: Identity,
    /// The player record owned by that account.
    pub player: Player,
}

/// Require an authenticated caller.
///
/// # Errors
///
/// Returns [`GameError::Unauthenticated`] for anonymous requests.
pub const fn require_authenticated(caller: Option<&Caller>) -> Result<&Caller, GameError> {
    match caller {
        Some(caller) => Ok(caller),
        None => Err(GameError::Unauthenticated),
    }
}

/// Require an authenticated caller with game-master privileges.
///
/// # Errors
///
/// Returns [`GameError::Unauthenticated`] for anonymous requests and
/// [`GameError::AccessDenied`] for callers without the game-master role.
/// No partial execution: callers of this function gate before touching
/// any state.
pub fn require_game_master(caller: Option<&Caller>) -> Result<&Caller, GameError> {
    let caller = match require_authenticated(caller) {
        Ok(caller) => caller,
        Err(e) => return Err(e),
    };
    if caller.player.role.is_game_master() {
        Ok(caller)
    } else {
        Err(GameError::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::Utc;
    use geohunt_types::{PlayerId, Role, UserId};

    use super::*;

    fn caller_with_role(role: Role) -> Caller {
        let user_id = UserId::new();
        let mut player = Player::new(PlayerId::new(), user_id);
        player.role = role;
        Caller {
            identity: Identity {
                id: user_id,
                username: String::from("alice"),
                password_hash: String::from("$argon2id$stub"),
                email: String::from("alice@example.com"),
                created_at: Utc::now(),
            },
            player,
        }
    }

    #[test]
    fn anonymous_is_unauthenticated() {
        assert!(matches!(
            require_authenticated(None),
            Err(GameError::Unauthenticated)
        ));
        assert!(matches!(
            require_game_master(None),
            Err(GameError::Unauthenticated)
        ));
    }

    #[test]
    fn member_passes_auth_but_not_the_gate() {
        let caller = caller_with_role(Role::Member);
        assert!(require_authenticated(Some(&caller)).is_ok());
        assert!(matches!(
            require_game_master(Some(&caller)),
            Err(GameError::AccessDenied)
        ));
    }

    #[test]
    fn game_master_passes_the_gate() {
        let caller = caller_with_role(Role::GameMaster);
        assert!(require_game_master(Some(&caller)).is_ok());
    }
}
