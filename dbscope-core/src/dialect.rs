//! SQL dialects supported by the engine
//!
//! Only DDL rendering for declared tables lives here; everything else is
//! passed through `sqlx`'s `Any` driver untouched.

use std::fmt;

use crate::error::ConfigError;
use crate::schema::ColumnType;

/// Database backend selected by the connection string scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Detect the dialect from a connection string.
    ///
    /// # Example
    ///
    /// ```
    /// use dbscope_core::Dialect;
    ///
    /// assert_eq!(Dialect::from_url("postgres://localhost/app").unwrap(), Dialect::Postgres);
    /// assert_eq!(Dialect::from_url("sqlite::memory:").unwrap(), Dialect::Sqlite);
    /// ```
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let scheme = url
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .unwrap_or(url)
            .to_ascii_lowercase();

        match scheme.as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(ConfigError::UnsupportedScheme { scheme }),
        }
    }

    /// Short lowercase name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// SQL type for a declared column type
    pub fn column_type(&self, ty: ColumnType) -> &'static str {
        match (self, ty) {
            (_, ColumnType::BigInt) => "BIGINT",
            (_, ColumnType::Integer) => "INTEGER",
            (_, ColumnType::Text) => "TEXT",
            (_, ColumnType::Boolean) => "BOOLEAN",
            (Self::Postgres, ColumnType::Real) => "DOUBLE PRECISION",
            (Self::Sqlite, ColumnType::Real) => "REAL",
        }
    }

    /// Column definition tail for an auto-incrementing integer primary key
    pub fn auto_primary_key(&self) -> &'static str {
        match self {
            Self::Postgres => "BIGSERIAL PRIMARY KEY",
            Self::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quote an identifier with double quotes (valid for both dialects)
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_postgres_schemes() {
        assert_eq!(
            Dialect::from_url("postgres://u:p@localhost/db").unwrap(),
            Dialect::Postgres
        );
        assert_eq!(
            Dialect::from_url("PostgreSQL://localhost/db?sslmode=disable").unwrap(),
            Dialect::Postgres
        );
    }

    #[test]
    fn test_detect_sqlite() {
        assert_eq!(Dialect::from_url("sqlite://app.db?mode=rwc").unwrap(), Dialect::Sqlite);
        assert_eq!(Dialect::from_url("sqlite::memory:").unwrap(), Dialect::Sqlite);
    }

    #[test]
    fn test_unsupported_scheme() {
        let err = Dialect::from_url("mysql://localhost/db").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme { ref scheme } if scheme == "mysql"));
    }

    #[test]
    fn test_column_types_differ_for_real() {
        assert_eq!(Dialect::Postgres.column_type(ColumnType::Real), "DOUBLE PRECISION");
        assert_eq!(Dialect::Sqlite.column_type(ColumnType::Real), "REAL");
        assert_eq!(Dialect::Sqlite.column_type(ColumnType::Text), "TEXT");
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("notes"), "\"notes\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
