//! Common types for model engines
//!
//! Messages, completion options and streaming chunks shared by every
//! engine implementation.

use serde::{Deserialize, Serialize};

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Message role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Options for completion requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Upper bound on generated tokens; unbounded when `None`
    pub max_tokens: Option<usize>,
}

impl CompletionOptions {
    pub fn with_max_tokens(max_tokens: Option<usize>) -> Self {
        Self { max_tokens }
    }
}

/// Streaming response chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    pub choices: Vec<StreamChoice>,
}

impl StreamChunk {
    /// Build a single-choice chunk carrying `content`
    pub fn delta(content: impl Into<String>) -> Self {
        Self { choices: vec![StreamChoice { delta: Delta { content: Some(content.into()) } }] }
    }

    /// Text carried by the first choice; a chunk without content yields `""`
    pub fn text(&self) -> &str {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
            .unwrap_or("")
    }
}

/// A choice in a streaming response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChoice {
    pub delta: Delta,
}

/// Delta content in streaming response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub content: Option<String>,
}

/// One model loading report
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProgress {
    pub text: String,
    /// Fraction in `0.0..=1.0` when the stage is measurable
    pub progress: Option<f64>,
}

impl LoadProgress {
    pub fn new(text: impl Into<String>, progress: Option<f64>) -> Self {
        Self { text: text.into(), progress }
    }
}
