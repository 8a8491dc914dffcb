use thiserror::Error;
use todos_api::v1::TodoId;

/// A request that did not produce the expected response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend could not be reached, or answered with something that
    /// could not be decoded.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, detail: Option<String> },
}

impl ApiError {
    /// The most helpful message available: the server's `detail` when it sent
    /// one, the error's own description otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            err => err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Todo title cannot be empty!")]
    EmptyTitle,

    /// Another write on the same todo has not finished yet.
    #[error("todo {0} is still being saved")]
    Busy(TodoId),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ControllerError {
    pub fn user_message(&self) -> String {
        match self {
            ControllerError::Api(err) => err.user_message(),
            err => err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Todo title cannot be empty!")]
    EmptyTitle,

    #[error("a submission is already in progress")]
    Busy,

    /// The selected todo disappeared from the list before it was submitted.
    #[error("the todo being edited no longer exists")]
    SelectionGone,

    #[error(transparent)]
    Controller(#[from] ControllerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_wins_over_status_text() {
        let err = ApiError::Status {
            status: 400,
            detail: Some(String::from("title: This field may not be blank.")),
        };
        assert_eq!(err.user_message(), "title: This field may not be blank.");
    }

    #[test]
    fn status_text_without_detail() {
        let err = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(), "Request failed with status code 500");
    }

    #[test]
    fn controller_error_forwards_api_message() {
        let err = ControllerError::from(ApiError::Status {
            status: 404,
            detail: Some(String::from("Not found.")),
        });
        assert_eq!(err.user_message(), "Not found.");
    }
}
