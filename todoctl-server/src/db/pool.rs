//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is built once
//! by the binary and handed to repositories by reference; nothing in this
//! crate keeps a global handle.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use super::repos::QUERY_TIMEOUT;

/// Default maximum connections for the pool.
/// Kept low; the backend does the real serialization.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Upper bound for building the pool and its first liveness probe.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pool startup and liveness errors
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Connection descriptor is empty or does not parse
    #[error("invalid connection descriptor: {0}")]
    Config(String),

    /// Backend refused or dropped the connection
    #[error("could not reach database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Backend did not answer in time
    #[error("database did not respond within {0:?}")]
    ConnectTimeout(Duration),
}

impl PoolError {
    /// True for every failure to reach a running backend.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::ConnectTimeout(_))
    }
}

/// Tunables for [`StorePool::init_with`].
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

/// Liveness probe used by the health route.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn health_check(&self) -> Result<(), PoolError>;
}

/// Bounded set of live Postgres connections, shared for the process lifetime.
///
/// Safe for unbounded concurrent use; checkout and return happen inside
/// sqlx for every query.
#[derive(Debug)]
pub struct StorePool {
    pool: PgPool,
}

impl StorePool {
    /// Create the pool with default settings and probe it.
    ///
    /// # Errors
    ///
    /// [`PoolError::Config`] for an empty or malformed descriptor,
    /// [`PoolError::Connect`] / [`PoolError::ConnectTimeout`] when the
    /// backend cannot be reached within [`CONNECT_TIMEOUT`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// let pool = StorePool::init("postgres://localhost/todos").await?;
    /// ```
    pub async fn init(descriptor: &str) -> Result<Self, PoolError> {
        Self::init_with(descriptor, PoolSettings::default()).await
    }

    /// Create the pool with custom options and probe it.
    pub async fn init_with(descriptor: &str, settings: PoolSettings) -> Result<Self, PoolError> {
        let options = parse_descriptor(descriptor)?;

        tracing::info!(
            max_connections = settings.max_connections,
            "Connecting to database..."
        );

        let connect = async {
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.connect_timeout)
                .connect_with(options)
                .await?;
            probe(&pool).await?;
            Ok::<_, sqlx::Error>(pool)
        };

        let pool = match tokio::time::timeout(settings.connect_timeout, connect).await {
            Ok(Ok(pool)) => pool,
            Ok(Err(sqlx::Error::PoolTimedOut)) | Err(_) => {
                tracing::error!(timeout = ?settings.connect_timeout, "Database did not respond");
                return Err(PoolError::ConnectTimeout(settings.connect_timeout));
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Unable to connect to database");
                return Err(PoolError::Connect(e));
            }
        };

        tracing::info!("Connected to database");
        Ok(Self { pool })
    }

    /// Release every connection. Idempotent.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        tracing::info!("Closing database pool");
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Underlying sqlx handle (cheap to clone, shares the same connections).
    pub fn pg_pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl HealthProbe for StorePool {
    /// Ping the existing pool, bounded by the per-operation ceiling.
    async fn health_check(&self) -> Result<(), PoolError> {
        match tokio::time::timeout(QUERY_TIMEOUT, probe(&self.pool)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(PoolError::Connect(e)),
            Err(_) => Err(PoolError::ConnectTimeout(QUERY_TIMEOUT)),
        }
    }
}

fn parse_descriptor(descriptor: &str) -> Result<PgConnectOptions, PoolError> {
    let descriptor = descriptor.trim();
    if descriptor.is_empty() {
        return Err(PoolError::Config("connection descriptor is empty".into()));
    }

    PgConnectOptions::from_str(descriptor).map_err(|e| {
        tracing::error!(error = %e, "Unable to parse database connection string");
        PoolError::Config(e.to_string())
    })
}

async fn probe(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
