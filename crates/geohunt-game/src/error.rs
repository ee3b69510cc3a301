//! The domain error taxonomy.
//!
//! Mirrors the boundary behavior the HTTP layer must produce: validation
//! problems carry field-level messages, lookups of absent records are
//! generic not-found responses, privilege problems are refused uniformly,
//! and bad credentials never reveal whether the handle or the password
//! was wrong.

use geohunt_store::StoreError;
use validator::ValidationErrors;

/// Errors produced by the domain services.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Malformed input; carries per-field messages for the client.
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    /// A referenced record does not exist. The string names the entity
    /// kind only, never the looked-up value.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// No authenticated caller on an operation that requires one.
    #[error("authentication required")]
    Unauthenticated,

    /// The caller is authenticated but not allowed to do this.
    #[error("access denied")]
    AccessDenied,

    /// Login failed. Deliberately uniform for unknown handles and wrong
    /// passwords.
    #[error("username/password incorrect")]
    AuthenticationFailure,

    /// The repository layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing or another internal operation failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// Build a single-field validation error.
    pub fn field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        let mut err = validator::ValidationError::new(code);
        err.message = Some(std::borrow::Cow::Borrowed(message));
        errors.add(field, err);
        Self::Validation(errors)
    }
}
