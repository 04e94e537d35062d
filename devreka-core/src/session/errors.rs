//! Error types for idea sessions

use crate::llm::LLMError;
use thiserror::Error;

/// Errors raised by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// A required option group has no selection
    #[error("Please choose a {group} before generating an idea")]
    MissingSelection { group: &'static str },

    /// A choice value that does not exist in its group
    #[error("Unknown {group} '{value}'")]
    InvalidChoice { group: &'static str, value: String },

    /// Engine creation failed
    #[error("The models could not be loaded: {0}")]
    EnginesUnavailable(#[source] LLMError),

    /// The request or its stream failed
    #[error("The model failed to answer: {0}")]
    Generation(#[source] LLMError),

    /// An operation needs a generated idea first
    #[error("Generate an idea first")]
    NoIdea,
}

impl SessionError {
    pub fn missing(group: &'static str) -> Self {
        Self::MissingSelection { group }
    }

    pub fn invalid(group: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidChoice { group, value: value.into() }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
