//! The database handle passed to whatever serves requests
//!
//! `Database` bundles the engine and the session factory. It is built once
//! at startup and cloned into request handlers; clones share one engine.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::engine::Engine;
use crate::env::Environment;
use crate::error::{DbScopeError, Result};
use crate::schema::{synchronize, Schema, SyncReport};
use crate::session::{Session, SessionStats};

/// Engine plus session factory
#[derive(Clone, Debug)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

#[derive(Debug)]
struct DatabaseInner {
    engine: Engine,
    stats: Arc<SessionStats>,
}

impl Database {
    /// Connect without touching the schema
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let engine = Engine::connect(config).await?;
        Ok(Self {
            inner: Arc::new(DatabaseInner {
                engine,
                stats: Arc::new(SessionStats::default()),
            }),
        })
    }

    /// Connect and create any missing declared tables.
    ///
    /// Schema declarations are validated before the engine is built.
    pub async fn open(config: &DatabaseConfig, schema: &Schema) -> Result<(Self, SyncReport)> {
        schema.validate()?;
        let db = Self::connect(config).await?;
        let report = db.sync_schema(schema).await?;
        Ok((db, report))
    }

    /// Full startup from an environment snapshot: resolve config, build the
    /// engine, synchronize the schema.
    ///
    /// Configuration errors are returned before any engine exists.
    pub async fn startup(env: &Environment, schema: &Schema) -> Result<(Self, SyncReport)> {
        let config = DatabaseConfig::from_environment(env)?;
        Self::open(&config, schema).await
    }

    /// Run additive schema synchronization on one session
    pub async fn sync_schema(&self, schema: &Schema) -> Result<SyncReport> {
        let mut session = self.session().await?;
        let dialect = session.dialect();
        let report = synchronize(&mut session, dialect, schema).await;
        session.close();
        report
    }

    /// Borrow a session. It is released when dropped or closed.
    pub async fn session(&self) -> Result<Session> {
        let conn = self.inner.engine.acquire().await?;
        Ok(Session::new(
            conn,
            self.inner.engine.dialect(),
            Arc::clone(&self.inner.stats),
        ))
    }

    /// Run `f` with a borrowed session, releasing it afterwards on every
    /// exit path.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let count: i64 = db
    ///     .with_session(|session| {
    ///         Box::pin(async move {
    ///             let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
    ///                 .fetch_one(&mut **session)
    ///                 .await?;
    ///             Ok::<_, DbScopeError>(n)
    ///         })
    ///     })
    ///     .await?;
    /// ```
    pub async fn with_session<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, std::result::Result<T, E>>,
        E: From<DbScopeError>,
    {
        let mut session = self.session().await.map_err(E::from)?;
        let result = f(&mut session).await;
        session.close();
        result
    }

    pub fn engine(&self) -> &Engine {
        &self.inner.engine
    }

    pub fn stats(&self) -> &SessionStats {
        &self.inner.stats
    }

    /// Close the engine. Only for orderly shutdown.
    pub async fn close(&self) {
        info!("Closing database engine");
        self.inner.engine.close().await;
    }
}
