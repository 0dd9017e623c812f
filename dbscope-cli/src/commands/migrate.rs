//! `dbscope migrate` - additive schema synchronization

use anyhow::Result;

pub async fn run_migrate() -> Result<()> {
    let (db, report) = super::startup().await?;

    for table in &report.created {
        println!("created:  {}", table);
    }
    for table in &report.existing {
        println!("existing: {}", table);
    }
    if report.is_noop() {
        println!("nothing to create");
    }
    println!(
        "schema in sync: {} created, {} existing",
        report.created.len(),
        report.existing.len()
    );

    db.close().await;
    Ok(())
}
