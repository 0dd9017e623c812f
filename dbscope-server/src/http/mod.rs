//! HTTP server layer
//!
//! Axum server with:
//! - Per-request database sessions (`DbSession` extractor)
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use extractors::DbSession;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
