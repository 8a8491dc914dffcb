use todos_api::v1::{is_blank, Todo, TodoFields, TodoId};

use crate::{
    api::TodoApi,
    error::{ControllerError, FormError},
    list::TodoList,
    state::ListState,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TodoId),
    Submitting,
}

/// What a submission will ask the list controller to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Create(TodoFields),
    Update(Todo),
}

/// Title/description entry, for new todos or the one selected for editing.
#[derive(Debug, Default)]
pub struct TodoForm {
    title: String,
    description: String,
    /// The edit-selection as last seen by [`TodoForm::sync`].
    selection: Option<TodoId>,
    submitting: bool,
    error: Option<String>,
}

impl TodoForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Inline message from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn mode(&self) -> FormMode {
        match (self.submitting, &self.selection) {
            (true, _) => FormMode::Submitting,
            (false, Some(id)) => FormMode::Edit(id.clone()),
            (false, None) => FormMode::Create,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.selection {
            Some(_) => "Edit Todo",
            None => "Add Todo",
        }
    }

    /// Whether a cancel action makes sense right now.
    pub fn can_cancel(&self) -> bool {
        !self.submitting
            && (self.selection.is_some() || !self.title.is_empty() || !self.description.is_empty())
    }

    /// Follow the list's edit-selection: fill the fields from a newly selected
    /// todo, or clear them when the selection goes away.
    pub fn sync(&mut self, state: &ListState) {
        if state.editing == self.selection {
            return;
        }

        self.selection = state.editing.clone();
        self.error = None;

        match state.editing_todo() {
            Some(todo) => {
                self.title = todo.title.clone();
                self.description = todo.description.clone().unwrap_or_default();
            }
            None => self.clear(),
        }
    }

    /// Validate the fields and enter the submitting state.
    pub fn begin(&mut self, state: &ListState) -> Result<Submission, FormError> {
        if self.submitting {
            return Err(FormError::Busy);
        }

        if is_blank(&self.title) {
            self.error = Some(FormError::EmptyTitle.to_string());
            return Err(FormError::EmptyTitle);
        }

        let description = match self.description.is_empty() {
            true => None,
            false => Some(self.description.clone()),
        };

        let submission = match &self.selection {
            Some(id) => {
                let selected = state.todo(id).ok_or(FormError::SelectionGone)?;
                Submission::Update(Todo {
                    title: self.title.clone(),
                    description,
                    ..selected.clone()
                })
            }
            None => Submission::Create(TodoFields::new(self.title.clone(), description)),
        };

        self.submitting = true;
        self.error = None;

        Ok(submission)
    }

    /// Leave the submitting state with the controller's answer.
    pub fn finish(&mut self, result: &Result<Todo, ControllerError>) {
        self.submitting = false;

        match result {
            Ok(_) => self.clear(),
            Err(err) => self.error = Some(err.user_message()),
        }
    }

    /// Submit through `list`, creating or updating depending on the mode.
    pub async fn submit<A: TodoApi>(&mut self, list: &TodoList<A>) -> Result<Todo, FormError> {
        let submission = self.begin(&list.snapshot())?;

        let result = match submission {
            Submission::Create(fields) => list.create(fields).await,
            Submission::Update(todo) => list.update(todo).await,
        };

        self.finish(&result);
        self.sync(&list.snapshot());

        Ok(result?)
    }

    /// Drop out of edit mode and empty the fields.
    pub fn cancel<A: TodoApi>(&mut self, list: &TodoList<A>) {
        if self.submitting {
            return;
        }

        list.cancel_edit();
        self.sync(&list.snapshot());
        self.clear();
    }

    fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.error = None;
    }
}
