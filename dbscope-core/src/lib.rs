//! dbscope-core: database engine and session lifecycle
//!
//! Startup resolves `DATABASE_URL` (optionally seeded from a `.env` file),
//! builds one shared connection pool, creates any missing declared tables,
//! and hands out scoped sessions that are always released.
//!
//! ```ignore
//! let schema = Schema::new().register::<Note>();
//! let (db, report) = Database::startup(&Environment::from_process(), &schema).await?;
//!
//! let mut session = db.session().await?;
//! session.ping().await?;
//! ```

pub mod config;
pub mod database;
pub mod dialect;
pub mod engine;
pub mod env;
pub mod error;
pub mod schema;
pub mod session;

pub use config::{DatabaseConfig, DATABASE_URL_VAR};
pub use database::Database;
pub use dialect::Dialect;
pub use engine::Engine;
pub use env::{load_dotenv, Environment};
pub use error::{ConfigError, DbScopeError, Result, SchemaError};
pub use schema::{synchronize, Column, ColumnType, Entity, Schema, SyncReport, Table};
pub use session::{Session, SessionStats};
