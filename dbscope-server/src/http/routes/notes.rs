//! Note endpoints
//!
//! Every handler takes a [`DbSession`], so each request borrows exactly one
//! session and releases it when the handler returns.

use axum::{
    extract::Query,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::NoteRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{DbSession, ValidId};
use crate::http::server::AppState;
use crate::models::{Note, NoteTitle, Page, PageQuery, PageWindow};

/// Create note request
#[derive(Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// GET /notes - list notes, newest first
async fn list_notes(
    DbSession(mut session): DbSession,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Note>>, ApiError> {
    let notes = NoteRepo::new(&mut session).list(query.into()).await?;
    Ok(Json(notes))
}

/// POST /notes - create a note
async fn create_note(
    DbSession(mut session): DbSession,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let title = NoteTitle::new(&req.title)?;
    let note = NoteRepo::new(&mut session).create(&title, &req.body).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /notes/{id} - fetch one note
async fn get_note(
    ValidId(id): ValidId,
    DbSession(mut session): DbSession,
) -> Result<Json<Note>, ApiError> {
    NoteRepo::new(&mut session)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound {
            resource: "note",
            id: id.to_string(),
        })
}

/// DELETE /notes/{id} - delete one note
async fn delete_note(
    ValidId(id): ValidId,
    DbSession(mut session): DbSession,
) -> Result<StatusCode, ApiError> {
    if NoteRepo::new(&mut session).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            resource: "note",
            id: id.to_string(),
        })
    }
}

/// Note routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", get(get_note).delete(delete_note))
}
