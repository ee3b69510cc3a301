//! Error types for the repository layer.
//!
//! All errors are propagated via [`StoreError`] which wraps the underlying
//! [`sqlx`] errors with additional context about which operation failed.
//! "Record does not exist" is not an error at this seam -- lookups return
//! `Option` and the domain layer decides whether absence is a failure.

/// Errors that can occur in the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// An insert violated the unique-username constraint.
    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    /// A stored value could not be decoded into its domain type.
    #[error("corrupt stored value: {0}")]
    Decode(String),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Promote a unique-constraint violation on the given username into
    /// [`StoreError::DuplicateUsername`], passing other errors through.
    pub fn from_insert(err: sqlx::Error, username: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // PostgreSQL class 23505: unique_violation.
            if db_err.code().as_deref() == Some("23505") {
                return Self::DuplicateUsername(username.to_owned());
            }
        }
        Self::Postgres(err)
    }
}
