//! Configuration management for ThinkTank
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, ThinktankError};
use crate::storage::SledStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure for ThinkTank
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Assistant service connection settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Local session storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Assistant service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Base URL of the assistant service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the chat endpoint, relative to `base_url`
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Request timeout in seconds; `None` waits for as long as the call takes
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_chat_path() -> String {
    "/api/chat".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            timeout_seconds: None,
        }
    }
}

impl AssistantConfig {
    /// Full URL of the chat endpoint
    ///
    /// # Examples
    ///
    /// ```
    /// use thinktank::config::AssistantConfig;
    ///
    /// let config = AssistantConfig::default();
    /// assert_eq!(config.chat_url(), "http://localhost:5001/api/chat");
    /// ```
    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.chat_path)
    }

    /// Full URL of the health endpoint
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url.trim_end_matches('/'))
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database location; defaults to the user's data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Location of the session database
    ///
    /// # Errors
    ///
    /// Returns error if no path is configured and the default data
    /// directory cannot be determined
    pub fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => SledStore::default_path(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ThinktankError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ThinktankError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("THINKTANK_ASSISTANT_URL") {
            self.assistant.base_url = base_url;
        }

        if let Ok(chat_path) = std::env::var("THINKTANK_CHAT_PATH") {
            self.assistant.chat_path = chat_path;
        }

        if let Ok(timeout) = std::env::var("THINKTANK_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.assistant.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid THINKTANK_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(storage_path) = std::env::var("THINKTANK_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(storage_path));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(path) = &cli.storage_path {
            tracing::debug!("Using storage path override from CLI: {}", path.display());
            self.storage.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the assistant URL is not http(s), the chat path is
    /// not absolute, or the timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.assistant.base_url.trim().is_empty() {
            return Err(
                ThinktankError::Config("assistant.base_url cannot be empty".to_string()).into(),
            );
        }

        let url = Url::parse(&self.assistant.base_url).map_err(|e| {
            ThinktankError::Config(format!(
                "Invalid assistant.base_url {}: {}",
                self.assistant.base_url, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ThinktankError::Config(format!(
                "assistant.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if !self.assistant.chat_path.starts_with('/') {
            return Err(ThinktankError::Config(
                "assistant.chat_path must start with '/'".to_string(),
            )
            .into());
        }

        if self.assistant.timeout_seconds == Some(0) {
            return Err(ThinktankError::Config(
                "assistant.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
