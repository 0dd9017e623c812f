//! Note entity and title validation

use dbscope_core::{Column, ColumnType, Entity, Table};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for note titles, in characters
const MAX_TITLE_LEN: usize = 200;

/// A stored note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub body: String,
    /// RFC 3339 timestamp, UTC
    pub created_at: String,
}

impl Entity for Note {
    fn table() -> Table {
        Table::new("notes")
            .column(Column::id("id"))
            .column(Column::new("title", ColumnType::Text))
            .column(Column::new("body", ColumnType::Text).default("''"))
            .column(Column::new("created_at", ColumnType::Text))
            .index("idx_notes_created", &["created_at"])
    }
}

/// Validated note title: trimmed, non-empty, at most 200 characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTitle(String);

impl NoteTitle {
    /// # Example
    /// ```
    /// use dbscope_server::models::NoteTitle;
    ///
    /// assert_eq!(NoteTitle::new("  groceries ").unwrap().as_str(), "groceries");
    /// assert!(NoteTitle::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Blank { field: "title" });
        }
        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbscope_core::Dialect;

    #[test]
    fn title_rules() {
        assert!(NoteTitle::new("ok").is_ok());
        assert_eq!(
            NoteTitle::new(""),
            Err(ValidationError::Blank { field: "title" })
        );
        assert!(NoteTitle::new(&"x".repeat(200)).is_ok());
        assert!(matches!(
            NoteTitle::new(&"x".repeat(201)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn title_length_counts_chars_not_bytes() {
        assert!(NoteTitle::new(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn notes_table_ddl() {
        let sql = Note::table().create_sql(Dialect::Postgres);
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"notes\" (\"id\" BIGSERIAL PRIMARY KEY, \
             \"title\" TEXT NOT NULL, \"body\" TEXT NOT NULL DEFAULT '', \
             \"created_at\" TEXT NOT NULL)"
        );
    }
}
