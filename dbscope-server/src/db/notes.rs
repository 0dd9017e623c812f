//! Note repository
//!
//! Works on a borrowed [`Session`] so one request is one unit of work:
//! - create: INSERT ... RETURNING (single round trip)
//! - list: COUNT + page query, newest first

use chrono::{SecondsFormat, Utc};
use dbscope_core::{DbScopeError, Session};

use crate::models::{Note, NoteTitle, Page, PageWindow};

/// Note repository
pub struct NoteRepo<'a> {
    session: &'a mut Session,
}

impl<'a> NoteRepo<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Insert a note and return the stored row.
    pub async fn create(&mut self, title: &NoteTitle, body: &str) -> Result<Note, DbScopeError> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (title, body, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, title, body, created_at
            "#,
        )
        .bind(title.as_str())
        .bind(body)
        .bind(created_at)
        .fetch_one(&mut **self.session)
        .await?;

        tracing::debug!(note_id = note.id, session_id = self.session.id(), "note created");
        Ok(note)
    }

    /// List notes, newest first.
    pub async fn list(&mut self, window: PageWindow) -> Result<Page<Note>, DbScopeError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&mut **self.session)
            .await?;

        let items = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, body, created_at
            FROM notes
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(&mut **self.session)
        .await?;

        Ok(Page::new(items, total, window))
    }

    /// Fetch one note by id.
    pub async fn get(&mut self, id: i64) -> Result<Option<Note>, DbScopeError> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, title, body, created_at FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut **self.session)
        .await?;

        Ok(note)
    }

    /// Delete a note. Returns false when no such note existed.
    pub async fn delete(&mut self, id: i64) -> Result<bool, DbScopeError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&mut **self.session)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
