//! Configuration management for Acumen
//!
//! Loads configuration from environment variables (optionally a `.env` file).
//! Credentials are held in `SecretString` and validated explicitly so the
//! core stays testable without environment mutation.

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};

/// Reasoning service (OpenAI-compatible chat completions) configuration
#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    /// API key for the reasoning service
    pub api_key: SecretString,
    /// Model to use
    pub model: String,
    /// Base URL for the API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Glean search backend configuration
#[derive(Debug, Clone)]
pub struct GleanConfig {
    /// Bearer token for the Glean REST API
    pub api_token: SecretString,
    /// Instance name or host (e.g. "guild" or "guild-be.glean.com")
    pub instance: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter
    pub level: String,
    /// Log format (pretty, json)
    pub format: String,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Reasoning service settings
    pub reasoning: ReasoningConfig,
    /// Glean search backend settings
    pub glean: GleanConfig,
    /// Logging settings
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            reasoning: ReasoningConfig {
                api_key: SecretString::from(
                    std::env::var("OPENAI_API_KEY").unwrap_or_default(),
                ),
                model: std::env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| "gpt-4o".to_string()),
                base_url: std::env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                timeout_secs: std::env::var("OPENAI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            },
            glean: GleanConfig {
                api_token: SecretString::from(
                    std::env::var("GLEAN_API_TOKEN").unwrap_or_default(),
                ),
                instance: std::env::var("GLEAN_INSTANCE").unwrap_or_default(),
                timeout_secs: std::env::var("GLEAN_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
            log: LogConfig {
                level: std::env::var("RUST_LOG")
                    .unwrap_or_else(|_| "info,acumen=debug".to_string()),
                format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            },
        })
    }

    /// Create a minimal config for testing
    pub fn minimal() -> Self {
        Config {
            reasoning: ReasoningConfig {
                api_key: SecretString::from(""),
                model: "gpt-4o".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                timeout_secs: 120,
            },
            glean: GleanConfig {
                api_token: SecretString::from(""),
                instance: String::new(),
                timeout_secs: 30,
            },
            log: LogConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    /// Validate that all required configuration is present
    pub fn validate(&self) -> Result<()> {
        if self.reasoning.api_key.expose_secret().is_empty() {
            return Err(Error::Config("OPENAI_API_KEY is required".to_string()));
        }
        if self.glean.api_token.expose_secret().is_empty() {
            return Err(Error::Config("GLEAN_API_TOKEN is required".to_string()));
        }
        if self.glean.instance.is_empty() {
            return Err(Error::Config("GLEAN_INSTANCE is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fails_validation() {
        let config = Config::minimal();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_passes_with_credentials() {
        let mut config = Config::minimal();
        config.reasoning.api_key = SecretString::from("sk-test");
        config.glean.api_token = SecretString::from("glean-test");
        config.glean.instance = "guild".to_string();
        assert!(config.validate().is_ok());
    }
}
