//! `PostgreSQL` backend: pool setup and embedded migrations.
//!
//! [`sqlx`] with runtime query construction (not compile-time checked) so
//! no live database is needed at build time. All queries are
//! parameterized. The repository trait implementations live in the
//! per-entity modules ([`accounts`](crate::accounts),
//! [`players`](crate::players), [`events`](crate::events),
//! [`participations`](crate::participations), [`chests`](crate::chests)).

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::error::StoreError;

/// Pool size used by [`PgStore::connect_url`].
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long an acquire waits for a free connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// The `PostgreSQL` backend of the [`Store`](crate::repo::Store) traits.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to `PostgreSQL` with the given pool size.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL cannot be parsed and
    /// [`StoreError::Postgres`] if the connection fails.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let connect_options: PgConnectOptions = url
            .parse()
            .map_err(|e: sqlx::Error| StoreError::Config(format!("invalid database URL: {e}")))?;

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(connect_options)
            .await?;

        tracing::info!(max_connections, "Connected to PostgreSQL");

        Ok(Self { pool })
    }

    /// Connect with the default pool size. Convenience for tests and
    /// local tooling.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the connection fails.
    pub async fn connect_url(url: &str) -> Result<Self, StoreError> {
        Self::connect(url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Run all pending migrations from the `migrations/` directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] if any migration fails.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Return a reference to the underlying [`PgPool`].
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}
