//! Engine configuration
//!
//! Which local models back the quick and detailed engines, and where the
//! Ollama server lives.

use serde::{Deserialize, Serialize};

/// Model identifiers for the two engines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Small model used for short replies
    pub quick: String,

    /// Larger model used for longer replies
    pub detailed: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self { quick: "llama3.2:3b".to_string(), detailed: "llama3.1:8b".to_string() }
    }
}

/// Ollama-specific configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub use_https: bool,

    /// Download a model that is not present locally instead of failing
    pub pull_missing: bool,
}

impl OllamaConfig {
    /// Server address including the port
    pub fn base_url(&self) -> String {
        let protocol = if self.use_https { "https" } else { "http" };
        format!("{}://{}:{}", protocol, self.host, self.port)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self { host: "localhost".to_string(), port: 11434, use_https: false, pull_missing: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        let mut config = OllamaConfig::default();
        assert_eq!(config.base_url(), "http://localhost:11434");

        config.use_https = true;
        config.host = "models.lan".to_string();
        config.port = 443;
        assert_eq!(config.base_url(), "https://models.lan:443");
    }

    #[test]
    fn test_partial_models_table() {
        let models: ModelsConfig = toml::from_str("quick = \"qwen2.5:0.5b\"").unwrap();
        assert_eq!(models.quick, "qwen2.5:0.5b");
        assert_eq!(models.detailed, "llama3.1:8b");
    }
}
