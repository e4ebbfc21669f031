//! Configuration data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;
use uuid::Uuid;

/// Logging level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "trace")]
    Trace,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// Base URL of the lex-llm workflow service
    pub lex_llm_host: String,
    /// Base URL of the lex-db document store
    pub lex_db_host: String,
    /// Total timeout in seconds for a single workflow run
    pub workflow_timeout_seconds: u32,
    /// Prefix for generated conversation identifiers
    pub conversation_id_prefix: String,
    /// Logging verbosity level
    pub log_level: LogLevel,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            lex_llm_host: "http://localhost:8001".to_string(),
            lex_db_host: "http://localhost:8000".to_string(),
            workflow_timeout_seconds: 300, // workflows can run for minutes
            conversation_id_prefix: "eval".to_string(),
            log_level: LogLevel::Info,
        }
    }
}

impl Configuration {
    /// Load configuration from file
    pub fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Configuration = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Return default configuration if file doesn't exist
            Ok(Configuration::default())
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn default_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = dirs::config_dir().ok_or("Could not determine config directory")?;
        Ok(config_dir.join("lex-eval").join("config.toml"))
    }

    /// Apply LEX_LLM_HOST / LEX_DB_HOST environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("LEX_LLM_HOST") {
            if !host.is_empty() {
                self.lex_llm_host = host;
            }
        }
        if let Ok(host) = std::env::var("LEX_DB_HOST") {
            if !host.is_empty() {
                self.lex_db_host = host;
            }
        }
        self
    }

    /// Load configuration from the default path with environment overrides applied
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::default_config_path()?;
        Ok(Self::load_from_file(&path)?.with_env_overrides())
    }

    /// Generate a fresh conversation identifier using the configured prefix
    pub fn generate_conversation_id(&self) -> String {
        format!("{}-{}", self.conversation_id_prefix, Uuid::new_v4())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (field, host) in [
            ("lex_llm_host", &self.lex_llm_host),
            ("lex_db_host", &self.lex_db_host),
        ] {
            match Url::parse(host) {
                Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
                Ok(url) => errors.push(format!(
                    "{} must use http or https (got {})",
                    field,
                    url.scheme()
                )),
                Err(e) => errors.push(format!("{} is not a valid URL: {}", field, e)),
            }
        }

        if self.workflow_timeout_seconds == 0 || self.workflow_timeout_seconds > 3600 {
            errors.push("workflow_timeout_seconds must be between 1 and 3600".to_string());
        }

        if self.conversation_id_prefix.is_empty()
            || self
                .conversation_id_prefix
                .chars()
                .any(|c| c.is_whitespace())
        {
            errors.push("conversation_id_prefix must be non-empty without whitespace".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
