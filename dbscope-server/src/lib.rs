//! dbscope-server: HTTP service over a scoped-session database
//!
//! Handlers borrow one database session per request through the
//! [`http::DbSession`] extractor. The data model in [`models`] is the
//! schema registry synchronized at startup.

pub mod db;
pub mod http;
pub mod models;

pub use http::{build_router, run_server, AppState, ServerConfig};
pub use models::schema;
