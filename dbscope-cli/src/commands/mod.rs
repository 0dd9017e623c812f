//! Subcommand implementations

pub mod check;
pub mod migrate;
pub mod ping;
pub mod serve;

use anyhow::{anyhow, Result};
use dbscope_core::{Database, Environment, SyncReport};

/// Load `.env`, resolve config, build the engine and sync the schema.
///
/// A missing `DATABASE_URL` fails here, before any engine exists.
pub async fn startup() -> Result<(Database, SyncReport)> {
    dbscope_core::load_dotenv();

    let (db, report) = Database::startup(&Environment::from_process(), &dbscope_server::schema())
        .await
        .map_err(|e| {
            if e.is_config() {
                anyhow!(e)
            } else {
                anyhow!(e).context("Database startup failed")
            }
        })?;

    Ok((db, report))
}
