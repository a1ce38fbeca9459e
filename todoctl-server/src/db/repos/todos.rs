//! To-do repository
//!
//! One round trip per operation; nothing is cached between calls.
//! - create: INSERT ... RETURNING, timestamps from the store clock
//! - update: full replace, `updated_at` refreshed, zero rows = not found
//! - delete: zero rows is success (idempotent)

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{bounded, DbError, QUERY_TIMEOUT};
use crate::db::pool::StorePool;
use crate::models::{TodoDraft, TodoId};

const RESOURCE: &str = "todo";

/// To-do record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Typed CRUD over to-do records.
///
/// Handlers depend on this trait rather than on [`TodoRepo`] so the HTTP
/// contract can be exercised without a live backend.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All records, in whatever order the backend returns them.
    async fn list_all(&self) -> Result<Vec<Todo>, DbError>;

    async fn get_by_id(&self, id: TodoId) -> Result<Todo, DbError>;

    async fn create(&self, draft: TodoDraft) -> Result<Todo, DbError>;

    /// Replace title, description and status of an existing record.
    async fn update(&self, id: TodoId, draft: TodoDraft) -> Result<Todo, DbError>;

    /// Remove a record. Deleting a missing id is not an error.
    async fn delete(&self, id: TodoId) -> Result<(), DbError>;
}

/// Postgres-backed to-do repository
#[derive(Debug, Clone)]
pub struct TodoRepo {
    pool: PgPool,
    timeout: Duration,
}

impl TodoRepo {
    pub fn new(pool: &StorePool) -> Self {
        Self {
            pool: pool.pg_pool().clone(),
            timeout: QUERY_TIMEOUT,
        }
    }

    /// Override the per-operation ceiling.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn not_found(id: TodoId) -> DbError {
        DbError::NotFound {
            resource: RESOURCE,
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl TodoStore for TodoRepo {
    async fn list_all(&self) -> Result<Vec<Todo>, DbError> {
        // No ORDER BY; callers must not rely on row order
        let todos = bounded("list_all", self.timeout, async {
            let rows = sqlx::query_as::<_, Todo>(
                r#"
                SELECT id, title, description, status, created_at, updated_at
                FROM todos
                "#,
            )
            .fetch_all(&self.pool)
            .await?;
            Ok::<_, DbError>(rows)
        })
        .await?;

        tracing::debug!(count = todos.len(), "Listed todos");
        Ok(todos)
    }

    async fn get_by_id(&self, id: TodoId) -> Result<Todo, DbError> {
        bounded("get_by_id", self.timeout, async {
            sqlx::query_as::<_, Todo>(
                r#"
                SELECT id, title, description, status, created_at, updated_at
                FROM todos
                WHERE id = $1
                "#,
            )
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
        })
        .await
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo, DbError> {
        // now() is fixed per transaction, so both timestamps start equal
        let todo = bounded("create", self.timeout, async {
            let row = sqlx::query_as::<_, Todo>(
                r#"
                INSERT INTO todos (title, description, status, created_at, updated_at)
                VALUES ($1, $2, $3, now(), now())
                RETURNING id, title, description, status, created_at, updated_at
                "#,
            )
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.status)
            .fetch_one(&self.pool)
            .await?;
            Ok::<_, DbError>(row)
        })
        .await?;

        tracing::debug!(id = todo.id, "Created todo");
        Ok(todo)
    }

    async fn update(&self, id: TodoId, draft: TodoDraft) -> Result<Todo, DbError> {
        // GREATEST keeps created_at <= updated_at even if the server clock steps back
        let todo = bounded("update", self.timeout, async {
            sqlx::query_as::<_, Todo>(
                r#"
                UPDATE todos
                SET title = $1,
                    description = $2,
                    status = $3,
                    updated_at = GREATEST(now(), created_at)
                WHERE id = $4
                RETURNING id, title, description, status, created_at, updated_at
                "#,
            )
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.status)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
        })
        .await?;

        tracing::debug!(id = todo.id, "Updated todo");
        Ok(todo)
    }

    async fn delete(&self, id: TodoId) -> Result<(), DbError> {
        let removed = bounded("delete", self.timeout, async {
            let result = sqlx::query("DELETE FROM todos WHERE id = $1")
                .bind(id.get())
                .execute(&self.pool)
                .await?;
            Ok::<_, DbError>(result.rows_affected())
        })
        .await?;

        tracing::debug!(%id, removed, "Deleted todo");
        Ok(())
    }
}
