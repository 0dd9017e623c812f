//! dbscope CLI - database session lifecycle tooling
//!
//! Entry point for:
//! - Configuration checks (`check`)
//! - Additive schema synchronization (`migrate`)
//! - Connectivity checks through a borrowed session (`ping`)
//! - The HTTP service (`serve`)

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "dbscope",
    author,
    version,
    about = "Database engine, schema sync and scoped sessions",
    long_about = "Reads DATABASE_URL (optionally from the nearest .env file), builds one shared \
                  connection pool, creates any missing tables, and serves requests that each \
                  borrow exactly one database session."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and print the database configuration without connecting
    Check(commands::check::CheckArgs),
    /// Connect and create any missing tables
    Migrate,
    /// Connect and round-trip one borrowed session
    Ping,
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Check(args) => commands::check::run_check(args),
        Commands::Migrate => commands::migrate::run_migrate().await,
        Commands::Ping => commands::ping::run_ping().await,
        Commands::Serve(args) => commands::serve::run_serve(args).await,
    }
}
