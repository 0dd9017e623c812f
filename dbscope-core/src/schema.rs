//! Declarative schema registry and additive synchronization
//!
//! Applications declare their tables once (usually through [`Entity`]) and
//! collect them in a [`Schema`]. On startup [`synchronize`] creates every
//! declared table and index that does not exist yet. Existing tables are
//! never dropped or altered.

use std::collections::HashSet;

use sqlx::AnyConnection;
use tracing::{debug, info};

use crate::dialect::{quote_ident, Dialect};
use crate::error::{DbScopeError, Result, SchemaError};

/// Portable column types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Integer,
    Text,
    Real,
    Boolean,
}

/// A declared column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    pub auto_primary_key: bool,
    pub default: Option<&'static str>,
}

impl Column {
    /// A NOT NULL column of the given type
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
            unique: false,
            auto_primary_key: false,
            default: None,
        }
    }

    /// An auto-incrementing 64-bit integer primary key
    pub const fn id(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::BigInt,
            nullable: false,
            unique: false,
            auto_primary_key: true,
            default: None,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Raw SQL default expression, e.g. `'open'` or `0`
    pub const fn default(mut self, expr: &'static str) -> Self {
        self.default = Some(expr);
        self
    }

    fn definition(&self, dialect: Dialect) -> String {
        let mut sql = quote_ident(self.name);
        sql.push(' ');

        if self.auto_primary_key {
            sql.push_str(dialect.auto_primary_key());
            return sql;
        }

        sql.push_str(dialect.column_type(self.ty));
        if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(expr) = self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(expr);
        }
        sql
    }
}

/// A declared secondary index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: &'static str,
    pub columns: Vec<&'static str>,
}

/// A declared table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, name: &'static str, columns: &[&'static str]) -> Self {
        self.indexes.push(Index {
            name,
            columns: columns.to_vec(),
        });
        self
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this table
    pub fn create_sql(&self, dialect: Dialect) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| c.definition(dialect))
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(self.name),
            columns.join(", ")
        )
    }

    /// `CREATE INDEX IF NOT EXISTS` statements for this table
    pub fn index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|idx| {
                let columns: Vec<String> = idx.columns.iter().map(|c| quote_ident(c)).collect();
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                    quote_ident(idx.name),
                    quote_ident(self.name),
                    columns.join(", ")
                )
            })
            .collect()
    }

    fn validate(&self) -> std::result::Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::EmptyTable {
                table: self.name.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.to_string(),
                    column: column.name.to_string(),
                });
            }
        }

        for index in &self.indexes {
            if let Some(missing) = index.columns.iter().find(|c| !seen.contains(*c)) {
                return Err(SchemaError::UnknownIndexColumn {
                    table: self.name.to_string(),
                    index: index.name.to_string(),
                    column: missing.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A Rust type backed by a declared table
pub trait Entity {
    fn table() -> Table;
}

/// Ordered collection of declared tables
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity's table
    pub fn register<E: Entity>(self) -> Self {
        self.table(E::table())
    }

    /// Register a table directly.
    ///
    /// Tables are created in registration order, so register referenced
    /// tables before the tables that reference them.
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Check the declarations without touching a database
    pub fn validate(&self) -> std::result::Result<(), SchemaError> {
        let mut names = HashSet::new();
        for table in &self.tables {
            if !names.insert(table.name) {
                return Err(SchemaError::DuplicateTable {
                    table: table.name.to_string(),
                });
            }
            table.validate()?;
        }
        Ok(())
    }
}

/// Outcome of a schema synchronization run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Tables that did not exist and were created
    pub created: Vec<String>,
    /// Tables that already existed and were left untouched
    pub existing: Vec<String>,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
    }
}

/// Create every declared table and index that is missing.
///
/// Additive only. Safe to run on every startup.
///
/// # Errors
///
/// Returns [`DbScopeError::Schema`] for inconsistent declarations (before any
/// SQL runs) and [`DbScopeError::Sync`] when a statement fails.
pub async fn synchronize(
    conn: &mut AnyConnection,
    dialect: Dialect,
    schema: &Schema,
) -> Result<SyncReport> {
    schema.validate()?;
    info!(tables = schema.tables().len(), %dialect, "Synchronizing schema...");

    let mut report = SyncReport::default();

    for table in schema.tables() {
        if table_exists(conn, table.name).await? {
            debug!(table = table.name, "table exists, leaving untouched");
            report.existing.push(table.name.to_string());
        } else {
            info!(table = table.name, "creating table");
            report.created.push(table.name.to_string());
        }

        // IF NOT EXISTS keeps this safe against a concurrent creator.
        sqlx::query(&table.create_sql(dialect))
            .execute(&mut *conn)
            .await
            .map_err(|e| DbScopeError::sync(table.name, e))?;

        for (index, sql) in table.indexes.iter().zip(table.index_sql()) {
            // SQLite turns an unknown quoted column into a string literal
            // and would happily index a constant, so check the columns first.
            for column in &index.columns {
                column_probe(conn, table.name, column)
                    .await
                    .map_err(|e| DbScopeError::sync(index.name, e))?;
            }
            sqlx::query(&sql)
                .execute(&mut *conn)
                .await
                .map_err(|e| DbScopeError::sync(index.name, e))?;
        }
    }

    info!(
        created = report.created.len(),
        existing = report.existing.len(),
        "Schema synchronization complete"
    );
    Ok(report)
}

/// SQLSTATE for `undefined_table`
const PG_UNDEFINED_TABLE: &str = "42P01";

/// Probe for a table with a query that reads no rows.
///
/// Only an undefined-table error means the table is missing. Anything else
/// (permissions, a broken view, I/O) is propagated.
async fn table_exists(conn: &mut AnyConnection, table: &str) -> Result<bool> {
    let probe = format!("SELECT 1 FROM {} WHERE 1 = 0", quote_ident(table));
    match sqlx::query(&probe).execute(&mut *conn).await {
        Ok(_) => Ok(true),
        Err(e) if is_undefined_table(&e, table) => Ok(false),
        Err(e) => Err(DbScopeError::sync(table, e)),
    }
}

fn is_undefined_table(err: &sqlx::Error, table: &str) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };
    if db_err.code().as_deref() == Some(PG_UNDEFINED_TABLE) {
        return true;
    }
    // SQLite reports the name it failed to resolve, which for a broken view
    // is the view's source table rather than the probed one.
    match db_err.message().strip_prefix("no such table: ") {
        Some(name) => name == table || name.strip_prefix("main.") == Some(table),
        None => false,
    }
}

/// Table-qualified column reference; errors in both dialects when the
/// column does not exist.
async fn column_probe(
    conn: &mut AnyConnection,
    table: &str,
    column: &str,
) -> std::result::Result<(), sqlx::Error> {
    let table = quote_ident(table);
    let probe = format!(
        "SELECT {}.{} FROM {} WHERE 1 = 0",
        table,
        quote_ident(column),
        table
    );
    sqlx::query(&probe).execute(&mut *conn).await?;
    Ok(())
}
