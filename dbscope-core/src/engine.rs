//! Engine: the shared connection pool
//!
//! Uses sqlx's `Any` driver so the same engine serves Postgres and SQLite
//! URLs. Pool sizing comes from [`DatabaseConfig`].

use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::dialect::Dialect;
use crate::error::{DbScopeError, Result};

/// Long-lived connection pool bound to one connection string
#[derive(Debug, Clone)]
pub struct Engine {
    pool: AnyPool,
    dialect: Dialect,
}

impl Engine {
    /// Build the pool and open the first connection.
    ///
    /// # Errors
    ///
    /// Returns [`DbScopeError::Connect`] if the database is unreachable or
    /// rejects the connection string.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = DatabaseConfig::new("postgres://localhost/app")?;
    /// let engine = Engine::connect(&config).await?;
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(config.url())
            .await
            .map_err(|source| DbScopeError::Connect {
                url: config.redacted_url(),
                source,
            })?;

        info!(
            dialect = %config.dialect(),
            url = %config.redacted_url(),
            max_connections = config.max_connections,
            "Database engine ready"
        );

        Ok(Self {
            pool,
            dialect: config.dialect(),
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Check out one pooled connection
    pub(crate) async fn acquire(&self) -> Result<PoolConnection<Any>> {
        self.pool
            .acquire()
            .await
            .map_err(|source| DbScopeError::Acquire { source })
    }

    /// Close every connection. Pending acquisitions fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
