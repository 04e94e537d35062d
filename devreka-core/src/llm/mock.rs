//! Mock engines for testing
//!
//! This module provides scripted implementations of `LLMProvider` and
//! `EngineFactory` for use in unit tests only.

#![cfg(test)]

use super::errors::LLMError;
use super::traits::{ChunkStream, EngineFactory, LLMProvider, ProgressSink};
use super::types::*;
use super::LOAD_COMPLETE_TEXT;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One step of a scripted reply
#[derive(Debug, Clone)]
pub enum Step {
    Chunk(String),
    Fail(String),
}

/// How the provider answers one request
#[derive(Debug, Clone)]
enum Script {
    Reply(Vec<Step>),
    Reject(String),
}

/// Mock provider replaying scripted replies in order
#[derive(Clone)]
pub struct MockLLMProvider {
    model: String,
    scripts: Arc<Mutex<VecDeque<Script>>>,
    call_history: Arc<Mutex<Vec<(Vec<Message>, CompletionOptions)>>>,
}

impl MockLLMProvider {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            scripts: Arc::new(Mutex::new(VecDeque::new())),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a reply streamed as the given fragments
    pub fn reply(&self, fragments: &[&str]) -> &Self {
        let steps = fragments.iter().map(|f| Step::Chunk(f.to_string())).collect();
        self.scripts.lock().unwrap().push_back(Script::Reply(steps));
        self
    }

    /// Queue a reply made of arbitrary steps, e.g. failing mid-stream
    pub fn reply_steps(&self, steps: Vec<Step>) -> &Self {
        self.scripts.lock().unwrap().push_back(Script::Reply(steps));
        self
    }

    /// Queue a request that fails before any fragment
    pub fn reject(&self, message: &str) -> &Self {
        self.scripts.lock().unwrap().push_back(Script::Reject(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(Vec<Message>, CompletionOptions)> {
        self.call_history.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_history.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMProvider for MockLLMProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete_stream(
        &self,
        messages: Vec<Message>,
        options: CompletionOptions,
    ) -> Result<ChunkStream, LLMError> {
        self.call_history.lock().unwrap().push((messages, options));

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::Reply(vec![Step::Chunk("Mock response".to_string())]));

        let steps = match script {
            Script::Reject(message) => return Err(LLMError::network(message)),
            Script::Reply(steps) => steps,
        };

        let items: Vec<Result<StreamChunk, LLMError>> = steps
            .into_iter()
            .map(|step| match step {
                Step::Chunk(text) => Ok(StreamChunk::delta(text)),
                Step::Fail(message) => Err(LLMError::streaming(message)),
            })
            .collect();

        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Factory handing out mock providers keyed by model id
pub struct MockFactory {
    providers: Vec<MockLLMProvider>,
    created: AtomicUsize,
    failures: Mutex<usize>,
    delay: Duration,
}

impl MockFactory {
    pub fn new(providers: Vec<MockLLMProvider>) -> Self {
        Self {
            providers,
            created: AtomicUsize::new(0),
            failures: Mutex::new(0),
            delay: Duration::from_millis(0),
        }
    }

    /// Fail the next `count` creations
    pub fn failing(self, count: usize) -> Self {
        *self.failures.lock().unwrap() = count;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineFactory for MockFactory {
    async fn create(
        &self,
        model_id: &str,
        progress: ProgressSink,
    ) -> Result<Arc<dyn LLMProvider>, LLMError> {
        progress(LoadProgress::new(format!("Loading {}", model_id), Some(0.5)));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        {
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(LLMError::model_not_found(model_id));
            }
        }

        let provider = self
            .providers
            .iter()
            .find(|p| p.model() == model_id)
            .cloned()
            .ok_or_else(|| LLMError::model_not_found(model_id))?;

        self.created.fetch_add(1, Ordering::SeqCst);
        progress(LoadProgress::new(LOAD_COMPLETE_TEXT, Some(1.0)));
        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_scripted_reply_order() {
        let provider = MockLLMProvider::new("quick");
        provider.reply(&["a", "b"]).reject("down");

        let stream = provider.complete_stream(vec![Message::user("hi")], Default::default());
        let chunks: Vec<_> = stream.await.unwrap().collect().await;
        let texts: Vec<_> = chunks.iter().map(|c| c.as_ref().unwrap().text().to_string()).collect();
        assert_eq!(texts, vec!["a", "b"]);

        let second = provider.complete_stream(vec![], Default::default()).await;
        assert!(second.is_err());
        assert_eq!(provider.call_count(), 2);
    }
}
