//! Sessions: short-lived units of work borrowed from the engine
//!
//! A [`Session`] owns one pooled connection for the duration of a logical
//! operation. It is released exactly once: either explicitly through
//! [`Session::close`] or implicitly when dropped, which also covers early
//! returns, `?` propagation and panic unwinding.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyConnection, Connection, Transaction};
use tracing::{debug, trace};

use crate::dialect::Dialect;
use crate::error::Result;

const EXPECT_MSG: &str = "session connection taken before release";

/// Session bookkeeping shared by every session of one database handle
#[derive(Debug, Default)]
pub struct SessionStats {
    opened: AtomicU64,
    closed: AtomicU64,
}

impl SessionStats {
    fn record_open(&self) -> u64 {
        self.opened.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record_close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }

    /// Sessions handed out so far
    pub fn opened(&self) -> u64 {
        self.opened.load(Ordering::SeqCst)
    }

    /// Sessions released so far
    pub fn closed(&self) -> u64 {
        self.closed.load(Ordering::SeqCst)
    }

    /// Sessions currently borrowed
    pub fn active(&self) -> u64 {
        self.opened().saturating_sub(self.closed())
    }
}

/// A borrowed unit of work.
///
/// Dereferences to [`AnyConnection`], so `&mut *session` can be passed
/// anywhere sqlx expects an executor.
///
/// # Example
///
/// ```ignore
/// let mut session = db.session().await?;
/// sqlx::query("DELETE FROM notes WHERE id = $1")
///     .bind(id)
///     .execute(&mut *session)
///     .await?;
/// session.close();
/// ```
pub struct Session {
    id: u64,
    conn: Option<PoolConnection<Any>>,
    dialect: Dialect,
    stats: Arc<SessionStats>,
}

impl Session {
    pub(crate) fn new(conn: PoolConnection<Any>, dialect: Dialect, stats: Arc<SessionStats>) -> Self {
        let id = stats.record_open();
        debug!(session_id = id, "session opened");
        Self {
            id,
            conn: Some(conn),
            dialect,
            stats,
        }
    }

    /// Process-local sequence number, for log correlation
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Start a transaction on this session.
    ///
    /// The transaction rolls back when dropped without
    /// [`Transaction::commit`].
    pub async fn begin(&mut self) -> Result<Transaction<'_, Any>> {
        Ok(Connection::begin(&mut **self).await?)
    }

    /// Round-trip a trivial statement
    pub async fn ping(&mut self) -> Result<()> {
        Connection::ping(&mut **self).await?;
        Ok(())
    }

    /// Release the session now instead of at the end of scope
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        // Dropping the pool connection hands it back to the pool.
        if let Some(conn) = self.conn.take() {
            drop(conn);
            self.stats.record_close();
            trace!(session_id = self.id, "session released");
        }
    }
}

impl Deref for Session {
    type Target = AnyConnection;

    fn deref(&self) -> &Self::Target {
        self.conn.as_deref().expect(EXPECT_MSG)
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_deref_mut().expect(EXPECT_MSG)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("dialect", &self.dialect)
            .field("released", &self.conn.is_none())
            .finish()
    }
}
