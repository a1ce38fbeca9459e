//! Process configuration: `.env` loading and database arguments

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use todoctl_server::db::{PoolSettings, DEFAULT_MAX_CONNECTIONS};

/// Load `.env` from the working directory (or a parent) if there is one.
///
/// A missing file is fine; a file that fails to parse is not.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).context("Failed to load .env"),
    }
}

/// Database connection arguments shared by every command that needs a pool
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Postgres connection string (overrides environment)
    #[arg(long, env = "DB_CONNECTION_STRING", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    /// The connection descriptor; absent or blank is a startup error.
    pub fn descriptor(&self) -> Result<&str> {
        match self.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => bail!(
                "DB_CONNECTION_STRING not set. Set via --database-url, DB_CONNECTION_STRING env, or .env"
            ),
        }
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            ..PoolSettings::default()
        }
    }
}
