//! To-do endpoints
//!
//! Handlers are stateless: parse, call the store once, render. A client
//! disconnect or the request timeout drops the handler future, which
//! cancels the in-flight query.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::db::Todo;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidTodoId};
use crate::http::server::AppState;
use crate::models::TodoDraft;

/// To-do as rendered on the wire
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            status: t.status,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoEnvelope {
    pub todo: TodoResponse,
}

impl From<Todo> for TodoEnvelope {
    fn from(t: Todo) -> Self {
        Self { todo: t.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoListEnvelope {
    pub todos: Vec<TodoResponse>,
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: i64,
    pub status: &'static str,
}

/// GET /todos - list every to-do
async fn list_todos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TodoListEnvelope>, ApiError> {
    let todos = state.todos.list_all().await?;

    Ok(Json(TodoListEnvelope {
        todos: todos.into_iter().map(TodoResponse::from).collect(),
    }))
}

/// GET /todos/{id} - get a single to-do
async fn get_todo(
    State(state): State<Arc<AppState>>,
    ValidTodoId(id): ValidTodoId,
) -> Result<Json<TodoEnvelope>, ApiError> {
    let todo = state.todos.get_by_id(id).await?;
    Ok(Json(todo.into()))
}

/// POST /todos - create a to-do
async fn create_todo(
    State(state): State<Arc<AppState>>,
    ValidJson(draft): ValidJson<TodoDraft>,
) -> Result<(StatusCode, Json<TodoEnvelope>), ApiError> {
    let todo = state.todos.create(draft).await?;
    tracing::info!(id = todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// PUT /todos/{id} - replace title, description and status
async fn update_todo(
    State(state): State<Arc<AppState>>,
    ValidTodoId(id): ValidTodoId,
    ValidJson(draft): ValidJson<TodoDraft>,
) -> Result<Json<TodoEnvelope>, ApiError> {
    let todo = state.todos.update(id, draft).await?;
    Ok(Json(todo.into()))
}

/// DELETE /todos/{id} - idempotent delete
async fn delete_todo(
    State(state): State<Arc<AppState>>,
    ValidTodoId(id): ValidTodoId,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.todos.delete(id).await?;

    Ok(Json(DeletedResponse {
        id: id.get(),
        status: "deleted",
    }))
}

/// To-do routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}
