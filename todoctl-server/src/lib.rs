//! todoctl-server: to-do records over HTTP, backed by PostgreSQL
//!
//! Layers, leaf-first:
//! - [`db::pool`] - the store pool (bounded set of live connections)
//! - [`db::repos`] - typed CRUD with a per-operation timeout ceiling
//! - [`http`] - axum handlers, error mapping and server plumbing

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbError, PoolError, StorePool, Todo, TodoRepo, TodoStore};
pub use http::{build_router, run_server, AppState, ServerConfig};
pub use models::{TodoDraft, TodoId, ValidationError};
