//! Local model engines
//!
//! This module defines the engine handle contract and its Ollama-backed
//! implementation. Handles stream replies as ordered text fragments and
//! report loading progress while they are created.

pub mod config;
pub mod errors;
mod mock;
pub mod ollama;
pub mod traits;
pub mod types;

pub use config::{ModelsConfig, OllamaConfig};
pub use errors::LLMError;
pub use ollama::{OllamaFactory, OllamaProvider};
pub use traits::{ChunkStream, EngineFactory, LLMProvider, ProgressSink};
pub use types::*;

#[cfg(test)]
pub(crate) use mock::{MockFactory, MockLLMProvider, Step};

/// Progress text reported once an engine is fully loaded
pub const LOAD_COMPLETE_TEXT: &str = "Finish loading";
