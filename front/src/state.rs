use std::cmp::Ordering;

use todos_api::v1::{Todo, TodoId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    /// The initial load failed, the list is not shown at all.
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// A transient feedback message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    /// Identifies this banner to its dismissal timer.
    pub id: u64,
    pub kind: BannerKind,
    pub message: String,
}

/// Everything a view needs to draw the list.
#[derive(Clone, Debug, Default)]
pub struct ListState {
    pub status: LoadStatus,
    /// Local, non-authoritative copy of the server's todos, in arrival order.
    pub todos: Vec<Todo>,
    pub banner: Option<Banner>,
    /// Id of the todo selected for editing.
    pub editing: Option<TodoId>,
}

impl ListState {
    pub fn todo(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    pub fn editing_todo(&self) -> Option<&Todo> {
        self.editing.as_ref().and_then(|id| self.todo(id))
    }

    /// Display order: pending todos before completed ones, newest first
    /// within each group.
    pub fn sorted(&self) -> Vec<&Todo> {
        let mut todos: Vec<_> = self.todos.iter().collect();
        todos.sort_by(|a, b| display_order(a, b));
        todos
    }
}

fn display_order(a: &Todo, b: &Todo) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| b.created_at.cmp(&a.created_at))
}
