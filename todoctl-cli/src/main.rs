//! todoctl CLI - runs the to-do HTTP service
//!
//! - `serve`: HTTP API over a pooled Postgres connection
//! - `check`: verify the database is reachable and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use commands::check::CheckArgs;
use commands::serve::ServeArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "todoctl",
    author,
    version,
    about = "To-do records over HTTP, backed by PostgreSQL"
)]
struct Cli {
    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Connect to the database, run a liveness probe, and exit
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so .env values feed the clap env fallbacks
    let dotenv = config::load_dotenv()?;
    let cli = Cli::parse();

    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug }).ok();
    if let Some(path) = dotenv {
        tracing::info!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Check(args) => commands::run_check(args).await?,
    }
    Ok(())
}
