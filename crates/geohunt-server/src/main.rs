//! Geohunt server entry point.
//!
//! Initializes logging, loads the YAML configuration, connects to
//! `PostgreSQL`, runs migrations, promotes the configured game masters,
//! and serves the game until the process is terminated.

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use geohunt_server::config::AppConfig;
use geohunt_server::server::start_server;
use geohunt_server::state::AppState;
use geohunt_store::{IdentityRepo, PgStore, PlayerRepo};
use geohunt_types::Role;

/// Default path of the YAML configuration file.
const CONFIG_PATH: &str = "geohunt.yaml";

/// Promote the configured usernames to game master.
///
/// Runs at every startup; promotion is the only way to gain the role, so
/// the HTTP surface never needs a privilege-escalation endpoint.
/// Usernames that are not registered yet are skipped with a warning and
/// picked up on the next restart.
async fn bootstrap_game_masters(store: &PgStore, usernames: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    for username in usernames {
        let Some(identity) = store.get_identity_by_username(username).await? else {
            tracing::warn!(%username, "Game master not registered yet, skipping");
            continue;
        };
        let Some(player) = store.get_player_by_user(identity.id).await? else {
            tracing::warn!(%username, "Game master has no player record, skipping");
            continue;
        };
        if player.role.is_game_master() {
            continue;
        }
        store.set_role(player.id, Role::GameMaster).await?;
        info!(%username, "Promoted to game master");
    }
    Ok(())
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, database setup, or the server
/// itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("GEOHUNT_CONFIG").unwrap_or_else(|_| String::from(CONFIG_PATH));
    let config = AppConfig::load(Path::new(&config_path))?;

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(config = %config_path, "geohunt-server starting");

    let store = PgStore::connect(&config.database.url, config.database.max_connections).await?;
    store.run_migrations().await?;
    bootstrap_game_masters(&store, &config.bootstrap.game_masters).await?;

    let state = Arc::new(AppState::new(Arc::new(store), &config.session));

    start_server(&config.server, state).await?;

    Ok(())
}
