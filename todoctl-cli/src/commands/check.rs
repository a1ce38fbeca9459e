//! Connectivity check: build the pool, probe it, report, exit

use anyhow::{Context, Result};
use clap::Parser;

use todoctl_server::db::{HealthProbe, StorePool};

use crate::config::DatabaseArgs;

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_check(args: CheckArgs) -> Result<()> {
    let descriptor = args.database.descriptor()?;

    let pool = StorePool::init_with(descriptor, args.database.pool_settings())
        .await
        .context("Failed to initialize database pool")?;

    let probe = pool.health_check().await.context("Health check failed");
    pool.close().await;
    probe?;

    println!("ok");
    Ok(())
}
