//! Session release guarantees
//!
//! Every session handed out must be released exactly once, whether its
//! scope ends normally, through an error, or through a panic.

use std::panic::AssertUnwindSafe;

use dbscope_core::{Column, ColumnType, Database, DatabaseConfig, DbScopeError, Schema, Table};
use futures::FutureExt;
use tempfile::TempDir;

async fn items_db(dir: &TempDir) -> Database {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("items.db").display());
    let config = DatabaseConfig::new(url).unwrap();
    let schema = Schema::new().table(
        Table::new("items")
            .column(Column::id("id"))
            .column(Column::new("name", ColumnType::Text)),
    );
    let (db, _) = Database::open(&config, &schema).await.unwrap();
    db
}

async fn item_count(db: &Database) -> i64 {
    db.with_session(|session| {
        Box::pin(async move {
            let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
                .fetch_one(&mut **session)
                .await?;
            Ok::<_, DbScopeError>(n)
        })
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn test_with_session_releases_on_success() {
    let dir = TempDir::new().unwrap();
    let db = items_db(&dir).await;
    let before = db.stats().closed();

    let inserted = db
        .with_session(|session| {
            Box::pin(async move {
                let result = sqlx::query("INSERT INTO items (name) VALUES ($1)")
                    .bind("widget")
                    .execute(&mut **session)
                    .await?;
                Ok::<_, DbScopeError>(result.rows_affected())
            })
        })
        .await
        .unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(db.stats().closed(), before + 1);
    assert_eq!(db.stats().active(), 0);
}

#[tokio::test]
async fn test_with_session_releases_on_error() {
    let dir = TempDir::new().unwrap();
    let db = items_db(&dir).await;
    let before = db.stats().closed();

    let err = db
        .with_session(|session| {
            Box::pin(async move {
                sqlx::query("SELECT * FROM no_such_table")
                    .execute(&mut **session)
                    .await?;
                Ok::<(), DbScopeError>(())
            })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DbScopeError::Query(_)));
    assert_eq!(db.stats().closed(), before + 1);
    assert_eq!(db.stats().active(), 0);
}

#[tokio::test]
async fn test_with_session_releases_on_panic() {
    let dir = TempDir::new().unwrap();
    let db = items_db(&dir).await;
    let before = db.stats().closed();

    let outcome = AssertUnwindSafe(db.with_session(|_session| {
        Box::pin(async move {
            if before < u64::MAX {
                panic!("handler blew up");
            }
            Ok::<(), DbScopeError>(())
        })
    }))
    .catch_unwind()
    .await;

    assert!(outcome.is_err());
    assert_eq!(db.stats().closed(), before + 1);
    assert_eq!(db.stats().active(), 0);

    // The pool is still usable afterwards.
    assert_eq!(item_count(&db).await, 0);
}

#[tokio::test]
async fn test_explicit_close_counts_once() {
    let dir = TempDir::new().unwrap();
    let db = items_db(&dir).await;
    let before = db.stats().closed();

    let mut session = db.session().await.unwrap();
    session.ping().await.unwrap();
    session.close();

    assert_eq!(db.stats().closed(), before + 1);
    assert_eq!(db.stats().opened(), db.stats().closed());
}

#[tokio::test]
async fn test_early_return_releases_guard() {
    let dir = TempDir::new().unwrap();
    let db = items_db(&dir).await;

    async fn lookup(db: &Database) -> Result<i64, DbScopeError> {
        let mut session = db.session().await?;
        let id: i64 = sqlx::query_scalar("SELECT id FROM items WHERE name = 'ghost'")
            .fetch_one(&mut *session)
            .await?;
        Ok(id)
    }

    let err = lookup(&db).await.unwrap_err();
    assert!(matches!(err, DbScopeError::Query(sqlx::Error::RowNotFound)));
    assert_eq!(db.stats().active(), 0);
}

#[tokio::test]
async fn test_concurrent_sessions_all_released() {
    let dir = TempDir::new().unwrap();
    let db = items_db(&dir).await;
    let before = db.stats().opened();

    // More scopes than pool connections; later ones wait for releases.
    let counts = futures::future::join_all((0..12).map(|_| item_count(&db))).await;

    assert!(counts.iter().all(|&n| n == 0));
    assert_eq!(db.stats().opened(), before + 12);
    assert_eq!(db.stats().active(), 0);
}

#[tokio::test]
async fn test_uncommitted_transaction_rolls_back() {
    let dir = TempDir::new().unwrap();
    let db = items_db(&dir).await;

    {
        let mut session = db.session().await.unwrap();
        let mut tx = session.begin().await.unwrap();
        sqlx::query("INSERT INTO items (name) VALUES ('draft')")
            .execute(&mut *tx)
            .await
            .unwrap();
        // dropped without commit
    }
    assert_eq!(item_count(&db).await, 0);

    {
        let mut session = db.session().await.unwrap();
        let mut tx = session.begin().await.unwrap();
        sqlx::query("INSERT INTO items (name) VALUES ('final')")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }
    assert_eq!(item_count(&db).await, 1);
}
