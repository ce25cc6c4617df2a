//! Loading/success/error state for asynchronously fetched data

use core::fmt::Display;

/// State of one piece of data a presentation layer is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Success(T),
    Error { message: String },
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    pub fn error<M: Into<String>>(message: M) -> Self {
        ViewState::Error {
            message: message.into(),
        }
    }

    /// `Success` for `Ok`, `Error` carrying the error's display text for `Err`
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ViewState::Success(value),
            Err(e) => ViewState::error(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ViewState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error { message } => Some(message),
            _ => None,
        }
    }
}
