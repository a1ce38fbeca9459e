//! HTTP server command
//!
//! Builds the one store pool for the process, runs the server, and closes
//! the pool after shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use todoctl_server::db::StorePool;
use todoctl_server::http::{run_server, AppState, ServerConfig};

use crate::config::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "TODOCTL_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Upper bound for a whole request, in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let descriptor = args.database.descriptor()?;

    tracing::info!("Starting todoctl server on {}", args.bind);

    let pool = StorePool::init_with(descriptor, args.database.pool_settings())
        .await
        .context("Failed to initialize database pool")?;
    let pool = Arc::new(pool);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };

    // Run server (blocks until shutdown)
    let result = run_server(AppState::from_pool(pool.clone()), config)
        .await
        .context("Server error");

    pool.close().await;
    result
}
