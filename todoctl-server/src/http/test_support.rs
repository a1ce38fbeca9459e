//! In-memory stand-ins for the repository and pool probe

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::db::{DbError, HealthProbe, PoolError, Todo, TodoStore};
use crate::models::{TodoDraft, TodoId};

/// Map-backed store that counts every call it receives.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<i64, Todo>>,
    next_id: AtomicI64,
    calls: AtomicUsize,
    broken: bool,
    stalled: bool,
}

impl MemoryStore {
    /// Every call fails with a backend error.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// Every call waits forever, like a backend that never answers.
    pub fn stalled() -> Self {
        Self {
            stalled: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<(), DbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.stalled {
            std::future::pending::<()>().await;
        }
        if self.broken {
            return Err(DbError::Sqlx(sqlx::Error::Protocol(
                "connection reset by peer".into(),
            )));
        }
        Ok(())
    }

    fn not_found(id: TodoId) -> DbError {
        DbError::NotFound {
            resource: "todo",
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Todo>, DbError> {
        self.enter().await?;
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn get_by_id(&self, id: TodoId) -> Result<Todo, DbError> {
        self.enter().await?;
        self.rows
            .lock()
            .unwrap()
            .get(&id.get())
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo, DbError> {
        self.enter().await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let todo = Todo {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: TodoId, draft: TodoDraft) -> Result<Todo, DbError> {
        self.enter().await?;
        let mut rows = self.rows.lock().unwrap();
        let todo = rows.get_mut(&id.get()).ok_or_else(|| Self::not_found(id))?;
        todo.title = draft.title;
        todo.description = draft.description;
        todo.status = draft.status;
        todo.updated_at = Utc::now().max(todo.created_at);
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<(), DbError> {
        self.enter().await?;
        self.rows.lock().unwrap().remove(&id.get());
        Ok(())
    }
}

/// Probe with a fixed answer.
pub struct StaticProbe {
    up: bool,
}

impl StaticProbe {
    pub fn up() -> Self {
        Self { up: true }
    }

    pub fn down() -> Self {
        Self { up: false }
    }
}

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn health_check(&self) -> Result<(), PoolError> {
        if self.up {
            Ok(())
        } else {
            Err(PoolError::ConnectTimeout(Duration::from_secs(5)))
        }
    }
}
