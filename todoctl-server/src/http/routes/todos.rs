//! Todo endpoints
//!
//! - GET    /todos           list (200), keyset via ?limit=&after_id=
//! - GET    /todos/{id}      single (200 / 404)
//! - POST   /todos           create (201 / 422)
//! - PATCH  /todos/{id}      partial update (200 / 404 / 422)
//! - DELETE /todos/{id}      delete (204 / 404)

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, TodoId};
use crate::http::server::AppState;
use crate::models::{KeysetParams, Todo, TodoChanges};

/// Create todo request
#[derive(Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
}

/// GET /todos - list todos ascending by id
async fn list_todos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<KeysetParams>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.store.list(params.into_keyset()).await?;
    Ok(Json(todos))
}

/// GET /todos/{id} - get a single todo
async fn get_todo(
    State(state): State<Arc<AppState>>,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.store.get(id).await?;
    Ok(Json(todo))
}

/// POST /todos - create a new todo
async fn create_todo(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.store.create(&req.title).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PATCH /todos/{id} - update only the supplied fields
async fn update_todo(
    State(state): State<Arc<AppState>>,
    TodoId(id): TodoId,
    JsonBody(changes): JsonBody<TodoChanges>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.store.update(id, changes).await?;
    Ok(Json(todo))
}

/// DELETE /todos/{id} - delete a todo
async fn delete_todo(
    State(state): State<Arc<AppState>>,
    TodoId(id): TodoId,
) -> Result<StatusCode, ApiError> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Todo routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
}
