//! Health check endpoints

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::DbSession;
use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Session counters for the database health check
#[derive(Serialize)]
pub struct SessionCounts {
    pub opened: u64,
    pub closed: u64,
    pub active: u64,
}

/// Database health check response
#[derive(Serialize)]
pub struct DbHealthResponse {
    pub status: &'static str,
    pub dialect: &'static str,
    pub sessions: SessionCounts,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/db - borrows a session and round-trips it
async fn health_db(
    State(state): State<AppState>,
    DbSession(mut session): DbSession,
) -> Result<Json<DbHealthResponse>, ApiError> {
    session.ping().await?;

    let stats = state.db.stats();
    Ok(Json(DbHealthResponse {
        status: "ok",
        dialect: session.dialect().name(),
        sessions: SessionCounts {
            opened: stats.opened(),
            closed: stats.closed(),
            active: stats.active(),
        },
    }))
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/db", get(health_db))
}
