//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, database path, and the
//! completion-provider section. The API credential is carried here and
//! injected at construction time; request handlers never read the
//! environment.

use serde::Deserialize;
use std::path::Path;
use syntestify_llm::openai::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// SQLite database path
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Completion provider settings
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Completion provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API credential. When absent the server still starts; only generate
    /// requests fail, with a configuration error.
    pub api_key: Option<String>,

    /// API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Completion model
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_database_path() -> String {
    "syntestify.db".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Create a default configuration (local bind, no credential)
    pub fn default_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            database_path: default_database_path(),
            openai: OpenAiConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
