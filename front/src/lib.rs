pub mod api;
pub mod app;
mod banner;
pub mod command;
pub mod config;
pub mod error;
pub mod form;
pub mod list;
pub mod state;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{HttpApi, TodoApi};
pub use banner::BannerTimings;
pub use config::Config;
pub use error::{ApiError, ControllerError, FormError};
pub use form::{FormMode, Submission, TodoForm};
pub use list::{AutoConfirm, Confirm, Deletion, TodoList};
pub use state::{Banner, BannerKind, ListState, LoadStatus};
