//! `dbscope check` - show the resolved configuration

use anyhow::Result;
use clap::Parser;
use dbscope_core::DatabaseConfig;

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Print the connection string unredacted
    #[arg(long)]
    pub show_secrets: bool,
}

pub fn run_check(args: CheckArgs) -> Result<()> {
    let env_file = dbscope_core::load_dotenv();
    let config = DatabaseConfig::from_env()?;

    let url = if args.show_secrets {
        config.url().to_string()
    } else {
        config.redacted_url()
    };

    match env_file {
        Some(path) => println!("env file:        {}", path.display()),
        None => println!("env file:        (none)"),
    }
    println!("dialect:         {}", config.dialect());
    println!("url:             {}", url);
    println!("max connections: {}", config.max_connections);
    println!("min connections: {}", config.min_connections);
    println!("acquire timeout: {}s", config.acquire_timeout.as_secs());

    Ok(())
}
