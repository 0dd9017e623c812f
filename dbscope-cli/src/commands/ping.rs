//! `dbscope ping` - borrow one session and round-trip it

use std::time::Instant;

use anyhow::{Context, Result};

pub async fn run_ping() -> Result<()> {
    let (db, _) = super::startup().await?;

    let started = Instant::now();
    let mut session = db.session().await?;
    session.ping().await.context("Ping failed")?;
    session.close();

    println!(
        "ok: {} responded in {} ms",
        db.engine().dialect(),
        started.elapsed().as_millis()
    );

    db.close().await;
    Ok(())
}
