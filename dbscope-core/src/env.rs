//! `.env` loading and environment snapshots
//!
//! Values from a `.env` file never replace variables that are already set.
//! A `.env` that cannot be read or parsed is skipped with a warning: only a
//! missing `DATABASE_URL` stops startup.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info, warn};

/// Load the nearest `.env` at or above the current directory into the
/// process environment.
///
/// Returns the path that was loaded. The file is parsed in full before any
/// variable is set, so a bad line loads nothing.
pub fn load_dotenv() -> Option<PathBuf> {
    let parsed = dotenvy::dotenv_iter().and_then(|iter| iter.collect::<Result<Vec<_>, _>>());
    match parsed {
        Ok(vars) => debug!(count = vars.len(), ".env parsed"),
        Err(e) if e.not_found() => {
            info!("Using environment variables only (no .env file found)");
            return None;
        }
        Err(e) => {
            warn!("Ignoring .env file: {}", e);
            return None;
        }
    }

    match dotenvy::dotenv() {
        Ok(path) => {
            info!("Loaded configuration from {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("Ignoring .env file: {}", e);
            None
        }
    }
}

/// A snapshot of environment variables used to resolve configuration.
///
/// Decouples config resolution from the global process environment so that
/// several configurations can be resolved side by side.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Snapshot the current process environment
    pub fn from_process() -> Self {
        Self {
            // Non-UTF-8 variables cannot be configuration values; skip them.
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build an environment from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}
