use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use todos_api::v1::Todo;

use crate::{
    form::{FormMode, TodoForm},
    state::{Banner, BannerKind, ListState, LoadStatus},
};

pub const EMPTY_MESSAGE: &str = "No todos found. Add some using the form!";

/// The list as text, one numbered entry per todo in display order.
pub fn list(state: &ListState) -> String {
    match &state.status {
        LoadStatus::Loading => return String::from("Loading todos..."),
        LoadStatus::Failed(message) => {
            return format!("Error: {message}. Please ensure the backend is running and reachable.")
        }
        LoadStatus::Ready => {}
    }

    if state.todos.is_empty() {
        return String::from(EMPTY_MESSAGE);
    }

    let mut out = String::from("Your Todos\n");
    for (i, todo) in state.sorted().into_iter().enumerate() {
        let editing = state.editing.as_ref() == Some(&todo.id);
        item(&mut out, i + 1, todo, editing);
    }

    out
}

fn item(out: &mut String, position: usize, todo: &Todo, editing: bool) {
    let check = if todo.completed { 'x' } else { ' ' };
    let marker = if editing { " (editing)" } else { "" };

    let _ = writeln!(out, "{position:>3}. [{check}] {}{marker}", todo.title);

    if let Some(description) = todo.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "       {description}");
    }

    let status = if todo.completed { "Completed" } else { "Pending" };
    let _ = writeln!(out, "       Status: {status}");
    let _ = writeln!(out, "       Created: {}", created(&todo.created_at));
}

fn created(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%a, %b %-d, %Y, %I:%M:%S %p")
        .to_string()
}

pub fn banner(banner: &Banner) -> String {
    match banner.kind {
        BannerKind::Success => format!("[ok] {}", banner.message),
        BannerKind::Error => format!("[error] {}", banner.message),
    }
}

/// The form's heading, its fields and any inline error.
pub fn form(form: &TodoForm) -> String {
    let mut out = String::new();

    let heading = match form.mode() {
        FormMode::Submitting => "Saving...",
        _ => form.heading(),
    };
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "  title:       {}", form.title());
    let _ = writeln!(out, "  description: {}", form.description());

    if let Some(error) = form.error() {
        let _ = writeln!(out, "  ! {error}");
    }

    out
}
