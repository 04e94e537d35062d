//! Ollama engine for local model execution
//!
//! Each `OllamaProvider` is bound to one model. `OllamaFactory` creates
//! providers, pulling missing models and warming them into memory while
//! reporting progress.

use super::traits::{ChunkStream, EngineFactory, LLMProvider, ProgressSink};
use super::types::*;
use super::LOAD_COMPLETE_TEXT;
use crate::llm::config::OllamaConfig;
use crate::llm::errors::LLMError;
use async_trait::async_trait;
use futures::StreamExt;
use ollama_rs::Ollama;
use ollama_rs::generation::chat::{ChatMessage, request::ChatMessageRequest};
use ollama_rs::models::ModelOptions;
use std::sync::Arc;
use tracing::{debug, info};

/// Ollama provider implementation
pub struct OllamaProvider {
    client: Arc<Ollama>,
    model_name: String,
}

impl OllamaProvider {
    /// Create a provider for `model` (doesn't connect yet)
    pub fn new(config: &OllamaConfig, model: impl Into<String>) -> Result<Self, LLMError> {
        Ok(Self { client: Arc::new(client_for(config)?), model_name: model.into() })
    }

    fn with_client(client: Arc<Ollama>, model: impl Into<String>) -> Self {
        Self { client, model_name: model.into() }
    }

    /// Convert our Message type to Ollama's ChatMessage
    fn convert_message(&self, msg: &Message) -> ChatMessage {
        match msg.role {
            Role::User => ChatMessage::user(msg.content.clone()),
            Role::Assistant => ChatMessage::assistant(msg.content.clone()),
        }
    }

    /// Convert Ollama options from our CompletionOptions
    fn convert_options(&self, options: &CompletionOptions) -> ModelOptions {
        let model_options = ModelOptions::default();

        match options.max_tokens {
            Some(max_tokens) => {
                model_options.num_predict(i32::try_from(max_tokens).unwrap_or(i32::MAX))
            }
            None => model_options,
        }
    }

    /// Check if the model is available locally
    pub async fn is_model_available(&self) -> Result<bool, LLMError> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| LLMError::network(e.to_string()))?;

        let tagged = format!("{}:latest", self.model_name);
        Ok(models.iter().any(|m| m.name == self.model_name || m.name == tagged))
    }

    /// Download the model, forwarding download progress
    async fn pull(&self, progress: &ProgressSink) -> Result<(), LLMError> {
        info!("Pulling model {}", self.model_name);

        let mut statuses = self
            .client
            .pull_model_stream(self.model_name.clone(), false)
            .await
            .map_err(|_e| LLMError::model_not_found(&self.model_name))?;

        while let Some(status) = statuses.next().await {
            let status = status.map_err(|e| LLMError::network(e.to_string()))?;
            let fraction = match (status.completed, status.total) {
                (Some(done), Some(total)) if total > 0 => Some(done as f64 / total as f64),
                _ => None,
            };
            progress(LoadProgress::new(
                format!("Downloading {}: {}", self.model_name, status.message),
                fraction,
            ));
        }

        Ok(())
    }

    /// Load the model into memory with an empty chat request
    async fn warm_up(&self) -> Result<(), LLMError> {
        let request = ChatMessageRequest::new(self.model_name.clone(), Vec::new());
        self.client
            .send_chat_messages(request)
            .await
            .map_err(|e| LLMError::provider("ollama", e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    fn model(&self) -> &str {
        &self.model_name
    }

    async fn complete_stream(
        &self,
        messages: Vec<Message>,
        options: CompletionOptions,
    ) -> Result<ChunkStream, LLMError> {
        let chat_messages: Vec<ChatMessage> =
            messages.iter().map(|m| self.convert_message(m)).collect();

        let request = ChatMessageRequest::new(self.model_name.clone(), chat_messages)
            .options(self.convert_options(&options));

        debug!("Streaming {} messages to {}", messages.len(), self.model_name);

        let mut upstream = self
            .client
            .send_chat_messages_stream(request)
            .await
            .map_err(|e| LLMError::network(e.to_string()))?;

        let converted_stream = async_stream::stream! {
            while let Some(item) = upstream.next().await {
                match item {
                    Ok(response) => {
                        let done = response.done;
                        yield Ok(StreamChunk::delta(response.message.content));
                        if done {
                            break;
                        }
                    }
                    Err(_) => {
                        yield Err(LLMError::streaming("Ollama returned an unreadable chunk"));
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(converted_stream))
    }
}

/// Creates Ollama-backed engines sharing one client
pub struct OllamaFactory {
    client: Arc<Ollama>,
    config: OllamaConfig,
}

impl OllamaFactory {
    pub fn new(config: OllamaConfig) -> Result<Self, LLMError> {
        let client = client_for(&config)?;
        Ok(Self { client: Arc::new(client), config })
    }
}

fn client_for(config: &OllamaConfig) -> Result<Ollama, LLMError> {
    let url = config.base_url();
    Ollama::try_new(url.as_str())
        .map_err(|e| LLMError::config(format!("Invalid Ollama address '{}': {}", url, e)))
}

#[async_trait]
impl EngineFactory for OllamaFactory {
    async fn create(
        &self,
        model_id: &str,
        progress: ProgressSink,
    ) -> Result<Arc<dyn LLMProvider>, LLMError> {
        let provider = OllamaProvider::with_client(self.client.clone(), model_id);

        progress(LoadProgress::new(format!("Checking {}", model_id), None));
        if !provider.is_model_available().await? {
            if !self.config.pull_missing {
                return Err(LLMError::model_not_found(model_id));
            }
            provider.pull(&progress).await?;
        }

        progress(LoadProgress::new(format!("Loading {} into memory", model_id), None));
        provider.warm_up().await?;

        info!("Engine ready: {}", model_id);
        progress(LoadProgress::new(LOAD_COMPLETE_TEXT, Some(1.0)));

        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_targets_configured_server() {
        let config = OllamaConfig { host: "gpu-box".to_string(), port: 8080, ..Default::default() };
        let provider = OllamaProvider::new(&config, "llama3.2:3b").unwrap();
        assert_eq!(provider.model(), "llama3.2:3b");
        assert_eq!(provider.client.url_str(), "http://gpu-box:8080/");
    }

    #[test]
    fn test_invalid_host_is_a_configuration_error() {
        let config = OllamaConfig { host: "not a host".to_string(), ..Default::default() };
        let err = OllamaFactory::new(config).err().unwrap();
        assert!(matches!(err, LLMError::ConfigurationError { .. }));
    }

    #[test]
    fn test_message_conversion_keeps_content() {
        let provider = OllamaProvider::new(&OllamaConfig::default(), "llama3.2:3b").unwrap();
        let converted = provider.convert_message(&Message::assistant("hello"));
        assert_eq!(converted.content, "hello");
    }

    #[tokio::test]
    #[ignore] // Requires Ollama to be running
    async fn test_local_detection() {
        let provider = OllamaProvider::new(&OllamaConfig::default(), "llama3.2:3b").unwrap();
        assert!(provider.is_model_available().await.is_ok());
    }
}
