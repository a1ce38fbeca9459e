//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Bind parameters only, never string-built SQL
//! - Every call wrapped in [`bounded`], capped at [`QUERY_TIMEOUT`]
//! - Zero matching rows is reported as [`DbError::NotFound`], not as a
//!   query failure

use std::future::Future;
use std::time::Duration;

pub mod todos;

pub use todos::{Todo, TodoRepo, TodoStore};

/// Ceiling for a single repository operation, independent of the caller.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{operation} exceeded {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Run `op` with an upper bound of `ceiling`.
///
/// If the caller's own future is dropped or timed out first, `op` is dropped
/// with it, so the effective deadline is the earlier of the two. Dropping a
/// sqlx future aborts the query and hands the connection back to the pool.
pub(crate) async fn bounded<T, F>(
    operation: &'static str,
    ceiling: Duration,
    op: F,
) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>>,
{
    match tokio::time::timeout(ceiling, op).await {
        Ok(result) => result,
        Err(_) => {
            // Logged once, where the error is rendered
            tracing::debug!(operation, timeout = ?ceiling, "Query timed out");
            Err(DbError::Timeout {
                operation,
                timeout: ceiling,
            })
        }
    }
}
