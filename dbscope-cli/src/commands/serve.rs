//! `dbscope serve` - run the HTTP service
//!
//! Full startup (config, engine, schema sync) happens before the listener
//! binds, so a misconfigured process never accepts requests.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use dbscope_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "DBSCOPE_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let (db, report) = super::startup().await?;
    tracing::info!(
        created = report.created.len(),
        existing = report.existing.len(),
        "Starting dbscope server on {}",
        args.bind
    );

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    run_server(db.clone(), config).await.context("Server error")?;

    db.close().await;
    Ok(())
}
