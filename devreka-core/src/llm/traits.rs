//! Traits for model engine implementations
//!
//! `LLMProvider` is the handle the session talks to; `EngineFactory` is how
//! handles get created and loaded.

use super::types::*;
use crate::llm::errors::LLMError;
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;

/// Ordered, finite stream of reply fragments
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, LLMError>> + Send>>;

/// Callback receiving model loading reports
pub type ProgressSink = Arc<dyn Fn(LoadProgress) + Send + Sync>;

/// Core trait for a loaded model engine
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the model ID being used
    fn model(&self) -> &str;

    /// Stream a chat completion
    async fn complete_stream(
        &self,
        messages: Vec<Message>,
        options: CompletionOptions,
    ) -> Result<ChunkStream, LLMError>;
}

/// Creates engine handles bound to one model each
#[async_trait]
pub trait EngineFactory: Send + Sync {
    /// Load `model_id` and return a handle, reporting progress along the way
    async fn create(
        &self,
        model_id: &str,
        progress: ProgressSink,
    ) -> Result<Arc<dyn LLMProvider>, LLMError>;
}
