use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use todos_api::v1::{Todo, TodoFields, TodoId};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::{api::TodoApi, error::ApiError};

pub fn todo(title: &str, completed: bool, created_secs: i64) -> Todo {
    let created_at = Utc.timestamp_opt(created_secs, 0).unwrap();
    Todo {
        id: Uuid::new_v4().into(),
        title: title.to_string(),
        description: None,
        completed,
        created_at,
        updated_at: Some(created_at),
    }
}

/// In-memory [`TodoApi`] that counts requests and fails on demand.
#[derive(Default)]
pub struct FakeApi {
    todos: Mutex<Vec<Todo>>,
    requests: AtomicUsize,
    failure: Mutex<Option<(u16, Option<String>)>>,
    gated: bool,
    gate_open: AtomicBool,
    gate: Notify,
}

impl FakeApi {
    pub fn with(todos: Vec<Todo>) -> Self {
        Self {
            todos: Mutex::new(todos),
            ..Default::default()
        }
    }

    /// Single-record reads wait until [`FakeApi::open_gate`] is called.
    pub fn gated(todos: Vec<Todo>) -> Self {
        Self {
            gated: true,
            ..Self::with(todos)
        }
    }

    pub fn open_gate(&self) {
        self.gate_open.store(true, Ordering::SeqCst);
        self.gate.notify_one();
    }

    /// Make every following request fail with `status`.
    pub fn fail_with(&self, status: u16, detail: Option<&str>) {
        *self.failure.lock().unwrap() = Some((status, detail.map(String::from)));
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn reset_requests(&self) {
        self.requests.store(0, Ordering::SeqCst);
    }

    pub fn stored(&self, id: &TodoId) -> Option<Todo> {
        let todos = self.todos.lock().unwrap();
        todos.iter().find(|todo| &todo.id == id).cloned()
    }

    /// Change a record behind the client's back.
    pub fn edit(&self, id: &TodoId, f: impl FnOnce(&mut Todo)) {
        let mut todos = self.todos.lock().unwrap();
        if let Some(todo) = todos.iter_mut().find(|todo| &todo.id == id) {
            f(todo);
        }
    }

    fn request(&self) -> Result<(), ApiError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        match self.failure.lock().unwrap().clone() {
            Some((status, detail)) => Err(ApiError::Status { status, detail }),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            detail: Some(String::from("Not found.")),
        }
    }
}

#[async_trait]
impl TodoApi for FakeApi {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        self.request()?;
        Ok(self.todos.lock().unwrap().clone())
    }

    async fn get(&self, id: &TodoId) -> Result<Todo, ApiError> {
        if self.gated && !self.gate_open.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }

        self.request()?;
        self.stored(id).ok_or_else(Self::not_found)
    }

    async fn create(&self, fields: &TodoFields) -> Result<Todo, ApiError> {
        self.request()?;

        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4().into(),
            title: fields.title.clone(),
            description: fields.description.clone(),
            completed: fields.completed,
            created_at: now,
            updated_at: Some(now),
        };
        self.todos.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn replace(&self, todo: &Todo) -> Result<Todo, ApiError> {
        self.request()?;

        let mut todos = self.todos.lock().unwrap();
        let stored = todos
            .iter_mut()
            .find(|stored| stored.id == todo.id)
            .ok_or_else(Self::not_found)?;

        stored.title = todo.title.clone();
        stored.description = todo.description.clone();
        stored.completed = todo.completed;
        stored.updated_at = Some(Utc::now());

        Ok(stored.clone())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        self.request()?;

        let mut todos = self.todos.lock().unwrap();
        let before = todos.len();
        todos.retain(|todo| &todo.id != id);

        match todos.len() < before {
            true => Ok(()),
            false => Err(Self::not_found()),
        }
    }
}
