use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use todos_api::v1::{is_blank, Todo, TodoFields, TodoId};
use tokio::sync::watch;
use tracing::{error, info};

use crate::{
    api::TodoApi,
    banner::{BannerTimer, BannerTimings},
    error::{ApiError, ControllerError},
    state::{ListState, LoadStatus},
};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this todo?";

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Gives the same answer to every question.
#[derive(Clone, Copy, Debug)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    /// The user said no, nothing was sent.
    Declined,
}

/// Owns the local copy of the todo list and every request made against it.
///
/// State is published through a [`watch`] channel; [`TodoList::subscribe`]
/// gives views a receiver that sees every change. Only the controller writes
/// to it.
pub struct TodoList<A> {
    api: A,
    state: Arc<watch::Sender<ListState>>,
    banners: BannerTimer,
    writes: InFlight,
}

impl<A: TodoApi> TodoList<A> {
    pub fn new(api: A, timings: BannerTimings) -> Self {
        let state = Arc::new(watch::Sender::new(ListState::default()));

        Self {
            api,
            banners: BannerTimer::new(state.clone(), timings),
            state,
            writes: InFlight::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> ListState {
        self.state.borrow().clone()
    }

    /// Fetch the whole list, replacing whatever is held locally.
    pub async fn load(&self) -> Result<(), ApiError> {
        match self.api.list().await {
            Ok(todos) => {
                info!(count = todos.len(), "loaded todos");
                self.state.send_modify(|state| {
                    state.todos = todos;
                    state.status = LoadStatus::Ready;
                });
                Ok(())
            }
            Err(err) => {
                error!("Error fetching todos: {}", err);
                let message = err.user_message();
                self.state
                    .send_modify(|state| state.status = LoadStatus::Failed(message));
                Err(err)
            }
        }
    }

    /// Create a new, incomplete todo.
    pub async fn create(&self, fields: TodoFields) -> Result<Todo, ControllerError> {
        if is_blank(&fields.title) {
            return Err(ControllerError::EmptyTitle);
        }

        let fields = TodoFields {
            completed: false,
            ..fields
        };

        match self.api.create(&fields).await {
            Ok(todo) => {
                info!(id = %todo.id, title = %todo.title, "created todo");
                self.state
                    .send_modify(|state| state.todos.push(todo.clone()));
                self.banners.success("Todo added successfully!").await;
                Ok(todo)
            }
            Err(err) => Err(self.fail("Failed to add todo", err).await),
        }
    }

    /// Mark a todo complete or pending.
    ///
    /// The current record is fetched from the server first so the write
    /// carries the server's view of every other field.
    pub async fn set_completion(
        &self,
        id: &TodoId,
        completed: bool,
    ) -> Result<Todo, ControllerError> {
        let _write = self.writes.claim(id)?;

        let result = async {
            let current = self.api.get(id).await?;
            let merged = Todo {
                completed,
                ..current
            };
            self.api.replace(&merged).await
        }
        .await;

        match result {
            Ok(todo) => {
                info!(id = %id, completed = todo.completed, "updated todo status");
                self.state.send_modify(|state| {
                    if let Some(local) = state.todos.iter_mut().find(|local| &local.id == id) {
                        local.completed = todo.completed;
                    }
                });

                let message = match completed {
                    true => "Todo marked as complete!",
                    false => "Todo marked as pending!",
                };
                self.banners.success(message).await;

                Ok(todo)
            }
            Err(err) => Err(self.fail("Failed to update todo status", err).await),
        }
    }

    /// Replace a todo with `todo`, leaving edit mode on success.
    pub async fn update(&self, todo: Todo) -> Result<Todo, ControllerError> {
        if is_blank(&todo.title) {
            return Err(ControllerError::EmptyTitle);
        }

        let id = todo.id.clone();
        let _write = self.writes.claim(&id)?;

        match self.api.replace(&todo).await {
            Ok(updated) => {
                info!(id = %id, title = %updated.title, "updated todo");
                self.state.send_modify(|state| {
                    if let Some(local) = state.todos.iter_mut().find(|local| local.id == id) {
                        *local = updated.clone();
                    }

                    if state.editing.as_ref() == Some(&id) {
                        state.editing = None;
                    }
                });
                self.banners.success("Todo updated successfully!").await;
                Ok(updated)
            }
            Err(err) => Err(self.fail("Failed to update todo", err).await),
        }
    }

    /// Delete a todo once `confirm` agrees to it.
    pub async fn delete(
        &self,
        id: &TodoId,
        confirm: &dyn Confirm,
    ) -> Result<Deletion, ControllerError> {
        let _write = self.writes.claim(id)?;

        if !confirm.confirm(DELETE_PROMPT).await {
            return Ok(Deletion::Declined);
        }

        match self.api.delete(id).await {
            Ok(()) => {
                info!(id = %id, "deleted todo");
                self.state.send_modify(|state| {
                    state.todos.retain(|todo| &todo.id != id);

                    if state.editing.as_ref() == Some(id) {
                        state.editing = None;
                    }
                });
                self.banners.success("Todo deleted successfully!").await;
                Ok(Deletion::Deleted)
            }
            Err(err) => Err(self.fail("Failed to delete todo", err).await),
        }
    }

    /// Select a todo for editing. Returns false when `id` is not in the list.
    pub fn select_for_edit(&self, id: &TodoId) -> bool {
        let mut found = false;

        self.state.send_if_modified(|state| {
            found = state.todo(id).is_some();
            if !found || state.editing.as_ref() == Some(id) {
                return false;
            }

            state.editing = Some(id.clone());
            true
        });

        found
    }

    pub fn cancel_edit(&self) {
        self.state
            .send_if_modified(|state| state.editing.take().is_some());
    }

    async fn fail(&self, action: &str, err: ApiError) -> ControllerError {
        error!("{}: {}", action, err);
        self.banners
            .error(format!("{}: {}", action, err.user_message()))
            .await;
        err.into()
    }
}

/// Ids of todos with a write still in flight.
#[derive(Default)]
struct InFlight {
    ids: Mutex<HashSet<TodoId>>,
}

impl InFlight {
    fn claim(&self, id: &TodoId) -> Result<WriteGuard<'_>, ControllerError> {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);

        if !ids.insert(id.clone()) {
            return Err(ControllerError::Busy(id.clone()));
        }

        Ok(WriteGuard {
            writes: self,
            id: id.clone(),
        })
    }
}

struct WriteGuard<'a> {
    writes: &'a InFlight,
    id: TodoId,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        let mut ids = self.writes.ids.lock().unwrap_or_else(PoisonError::into_inner);
        ids.remove(&self.id);
    }
}
