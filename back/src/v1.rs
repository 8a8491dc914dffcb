use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use todos_api::v1::{is_blank, ErrorBody, Todo, TodoFields};
use tracing::info;
use uuid::Uuid;

use crate::AppState;

pub const TITLE_MAX_LEN: usize = 200;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos/", get(get_todos).post(add_todo))
        .route(
            "/todos/:id/",
            get(get_todo).put(replace_todo).delete(delete_todo),
        )
}

/// Failures a handler reports to the client as `{"detail": ...}`.
#[derive(Debug)]
pub enum Failure {
    NotFound,
    Invalid(String),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Failure::NotFound => (StatusCode::NOT_FOUND, String::from("Not found.")),
            Failure::Invalid(detail) => (StatusCode::BAD_REQUEST, detail),
        };

        (status, Json(ErrorBody::new(detail))).into_response()
    }
}

fn validate(fields: &TodoFields) -> Result<(), Failure> {
    if is_blank(&fields.title) {
        return Err(Failure::Invalid(String::from("title: This field may not be blank.")));
    }

    if fields.title.chars().count() > TITLE_MAX_LEN {
        return Err(Failure::Invalid(format!(
            "title: Ensure this field has no more than {TITLE_MAX_LEN} characters."
        )));
    }

    Ok(())
}

async fn get_todos(State(state): State<Arc<AppState>>) -> Json<Vec<Todo>> {
    let todos = state.todos.lock().await;
    let mut todos: Vec<_> = todos.values().cloned().collect();
    todos.sort_unstable_by(|a, b| a.created_at.cmp(&b.created_at).reverse());
    Json(todos)
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, Failure> {
    let todos = state.todos.lock().await;
    todos.get(&id).cloned().map(Json).ok_or(Failure::NotFound)
}

async fn add_todo(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<TodoFields>,
) -> Result<(StatusCode, Json<Todo>), Failure> {
    validate(&fields)?;

    let id = Uuid::new_v4();
    let now = Utc::now();
    let todo = Todo {
        id: id.into(),
        title: fields.title,
        description: fields.description,
        completed: fields.completed,
        created_at: now,
        updated_at: Some(now),
    };

    let mut todos = state.todos.lock().await;
    todos.insert(id, todo.clone());

    info!(
        id = %todo.id,
        title = %todo.title,
        "created todo"
    );

    Ok((StatusCode::CREATED, Json(todo)))
}

async fn replace_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(fields): Json<TodoFields>,
) -> Result<Json<Todo>, Failure> {
    validate(&fields)?;

    let mut todos = state.todos.lock().await;
    let todo = todos.get_mut(&id).ok_or(Failure::NotFound)?;

    todo.title = fields.title;
    todo.description = fields.description;
    todo.completed = fields.completed;
    todo.updated_at = Some(Utc::now());

    info!(
        id = %todo.id,
        title = ?todo.title,
        completed = todo.completed,
        "replaced todo"
    );

    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Failure> {
    let mut todos = state.todos.lock().await;
    let todo = todos.remove(&id).ok_or(Failure::NotFound)?;

    info!(id = %todo.id, "deleted todo");

    Ok(StatusCode::NO_CONTENT)
}
