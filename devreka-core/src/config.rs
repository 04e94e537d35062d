//! Configuration file handling

use crate::llm::{ModelsConfig, OllamaConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration for devreka
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Models backing the two engines
    pub models: ModelsConfig,

    /// Ollama server settings
    pub ollama: OllamaConfig,

    /// Prompt settings
    pub prompt: PromptConfig,

    /// Export settings
    pub export: ExportConfig,
}

/// Prompt configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Language the model is asked to answer in
    pub language: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { language: "English".to_string() }
    }
}

/// Export configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exports are written to; the working directory when unset
    pub directory: Option<PathBuf>,
}

impl ExportConfig {
    pub fn directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Default location: `<config dir>/devreka/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("devreka").join("config.toml"))
    }

    /// Load `path` if given, else the default file if it exists, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.prompt.language, "English");
        assert_eq!(config.models.quick, "llama3.2:3b");
        assert_eq!(config.ollama.port, 11434);
        assert_eq!(config.export.directory(), PathBuf::from("."));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.models.detailed = "qwen2.5:14b".to_string();
        config.prompt.language = "Spanish".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ollama]\nhost = \"gpu-box\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.ollama.host, "gpu-box");
        assert_eq!(config.ollama.port, 11434);
        assert_eq!(config.models, ModelsConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
