//! Error types for model engine operations
//!
//! This module defines strongly-typed errors for engine creation and
//! streaming, using thiserror for automatic error trait implementations.

use thiserror::Error;

/// Main error type for model engine operations
#[derive(Debug, Error)]
pub enum LLMError {
    /// Network error occurred
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// Model not found or not available
    #[error("Model '{model}' not found or not available")]
    ModelNotFound { model: String },

    /// Streaming error
    #[error("Streaming error: {message}")]
    StreamingError { message: String },

    /// Invalid engine configuration
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    ProviderError { provider: String, message: String },
}

impl LLMError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    /// Create a model not found error
    pub fn model_not_found(model: impl Into<String>) -> Self {
        Self::ModelNotFound { model: model.into() }
    }

    /// Create a streaming error
    pub fn streaming(message: impl Into<String>) -> Self {
        Self::StreamingError { message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError { message: message.into() }
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderError { provider: provider.into(), message: message.into() }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LLMError::model_not_found("llama3.1:8b");
        assert_eq!(err.to_string(), "Model 'llama3.1:8b' not found or not available");

        let err = LLMError::streaming("connection reset");
        assert_eq!(err.to_string(), "Streaming error: connection reset");

        let err = LLMError::provider("ollama", "busy");
        assert_eq!(err.to_string(), "Provider error (ollama): busy");
    }

    #[test]
    fn test_network_error_display() {
        let err = LLMError::network("connection refused");
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
