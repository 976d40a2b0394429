//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (NEWSFAX_*)
//! 2. TOML config file (if NEWSFAX_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (NEWSFAX_*)
/// 2. TOML config file (if NEWSFAX_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite result store.
    ///
    /// Set via NEWSFAX_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// API key for the OpenAI-compatible chat endpoint.
    ///
    /// Set via NEWSFAX_OPENAI_API_KEY environment variable.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Base URL of the chat completions API.
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Chat model used for quote extraction and verdicts.
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// API key for Tavily extract and search.
    ///
    /// Set via NEWSFAX_TAVILY_API_KEY environment variable.
    #[serde(default)]
    pub tavily_api_key: Option<String>,

    #[serde(default = "default_tavily_base_url")]
    pub tavily_base_url: String,

    /// User-Agent string for outbound HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request HTTP timeout in milliseconds.
    ///
    /// Set via NEWSFAX_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Time budget for one whole fact check, in seconds.
    ///
    /// Set via NEWSFAX_CHECK_TIMEOUT_SECS environment variable.
    #[serde(default = "default_check_timeout_secs")]
    pub check_timeout_secs: u64,

    /// Attempts per key before it is reported as failed.
    ///
    /// Set via NEWSFAX_MAX_ATTEMPTS environment variable.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Page content beyond this many characters is not analyzed.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Maximum statements checked per page.
    #[serde(default = "default_max_facts")]
    pub max_facts: usize,

    /// Maximum sources kept per statement.
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./newsfax.sqlite")
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".into()
}

fn default_tavily_base_url() -> String {
    "https://api.tavily.com".into()
}

fn default_user_agent() -> String {
    "newsfax/0.1".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_check_timeout_secs() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    3
}

fn default_max_content_chars() -> usize {
    8_000
}

fn default_max_facts() -> usize {
    8
}

fn default_max_sources() -> usize {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            openai_model: default_openai_model(),
            tavily_api_key: None,
            tavily_base_url: default_tavily_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            check_timeout_secs: default_check_timeout_secs(),
            max_attempts: default_max_attempts(),
            max_content_chars: default_max_content_chars(),
            max_facts: default_max_facts(),
            max_sources: default_max_sources(),
        }
    }
}

impl AppConfig {
    /// HTTP timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Whole-check time budget.
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `NEWSFAX_`
    /// 2. TOML file from `NEWSFAX_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("NEWSFAX_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("NEWSFAX_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// OpenAI key, required once the fact-check pipeline is built.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "openai_api_key".into(),
            hint: "Set NEWSFAX_OPENAI_API_KEY environment variable".into(),
        })
    }

    /// Tavily key, required once the fact-check pipeline is built.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_tavily_api_key(&self) -> Result<&str, ConfigError> {
        self.tavily_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "tavily_api_key".into(),
            hint: "Set NEWSFAX_TAVILY_API_KEY environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./newsfax.sqlite"));
        assert_eq!(config.user_agent, "newsfax/0.1");
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.max_content_chars, 8_000);
        assert_eq!(config.max_sources, 3);
        assert!(config.openai_api_key.is_none());
        assert!(config.tavily_api_key.is_none());
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert_eq!(config.check_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_require_keys_missing() {
        let config = AppConfig::default();
        assert!(matches!(config.require_openai_api_key(), Err(ConfigError::Missing { .. })));
        assert!(matches!(config.require_tavily_api_key(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_keys_present() {
        let config = AppConfig {
            openai_api_key: Some("sk-test".into()),
            tavily_api_key: Some("tvly-test".into()),
            ..Default::default()
        };
        assert_eq!(config.require_openai_api_key().unwrap(), "sk-test");
        assert_eq!(config.require_tavily_api_key().unwrap(), "tvly-test");
    }

    #[test]
    fn test_coordinator_config_from_app_config() {
        let config = AppConfig { max_attempts: 5, check_timeout_secs: 60, ..Default::default() };
        let coordinator = crate::CoordinatorConfig::from(&config);
        assert_eq!(coordinator.max_attempts, 5);
        assert_eq!(coordinator.check_timeout, Duration::from_secs(60));
    }
}
